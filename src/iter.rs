use crate::grammar::Grammar;
use crate::sequitur::Sequitur;
use crate::symbol::{Symbol, SymbolKey};

/// Iterator that reconstructs the original sequence by expanding rules.
///
/// Keeps an explicit stack of the nonterminals it has descended through, so
/// deep grammars never recurse on the call stack.
pub struct SequiturIter<'a> {
    grammar: &'a Grammar,
    current: Option<SymbolKey>,
    stack: Vec<SymbolKey>,
}

impl<'a> SequiturIter<'a> {
    pub(crate) fn new(sequitur: &'a Sequitur) -> Self {
        let grammar = &sequitur.grammar;
        let start = grammar.first(grammar.root);

        let mut stack = Vec::new();
        let current = Self::resolve_forward(grammar, start, &mut stack);

        Self {
            grammar,
            current,
            stack,
        }
    }

    /// Walks forward from `key` to the next terminal, descending into rules
    /// and climbing out of finished ones.
    fn resolve_forward(
        grammar: &Grammar,
        mut key: SymbolKey,
        stack: &mut Vec<SymbolKey>,
    ) -> Option<SymbolKey> {
        loop {
            match grammar.symbols[key].symbol {
                Symbol::Terminal { .. } => return Some(key),

                Symbol::NonTerminal { rule, .. } => {
                    stack.push(key);
                    key = grammar.first(rule);
                }

                Symbol::Guard { .. } => {
                    // End of a body: resume after the reference we came from.
                    let parent = stack.pop()?;
                    key = grammar.next(parent);
                }
            }
        }
    }
}

impl Iterator for SequiturIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        let current_key = self.current?;

        let value = match self.grammar.symbols[current_key].symbol {
            Symbol::Terminal { value } => value,
            _ => unreachable!("resolve_forward only stops on terminals"),
        };

        let next_key = self.grammar.next(current_key);
        self.current = Self::resolve_forward(self.grammar, next_key, &mut self.stack);

        Some(value)
    }
}

impl Sequitur {
    /// Returns an iterator over the reconstructed sequence.
    pub fn iter(&self) -> SequiturIter<'_> {
        SequiturIter::new(self)
    }
}

impl<'a> IntoIterator for &'a Sequitur {
    type Item = u32;
    type IntoIter = SequiturIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
