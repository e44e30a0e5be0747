use crate::config::SequiturConfig;
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::symbol::NONTERMINAL_BASE;
use std::fmt;

/// Online grammar inference engine.
///
/// Maintains a context-free grammar whose root expands to exactly the values
/// appended so far, while enforcing two constraints after every append:
/// 1. Digram Uniqueness: no digram appears more than once
/// 2. Rule Utility: every rule other than the root is used at least twice
pub struct Sequitur {
    pub(crate) grammar: Grammar,

    /// Number of values appended
    length: usize,
}

impl Sequitur {
    /// Creates an empty engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SequiturConfig::default())
    }

    /// Creates an empty engine with the given configuration.
    pub fn with_config(config: SequiturConfig) -> Self {
        log::debug!("new grammar engine, delimiter {:?}", config.delimiter);
        Self {
            grammar: Grammar::new(config),
            length: 0,
        }
    }

    pub fn config(&self) -> &SequiturConfig {
        &self.grammar.config
    }

    /// Discards all rules and the digram index and restarts rule numbering.
    ///
    /// The configuration is kept.
    pub fn reset(&mut self) {
        log::debug!(
            "resetting grammar ({} values, {} rules, {} digrams)",
            self.length,
            self.grammar.rules.len(),
            self.grammar.digrams.len()
        );
        self.grammar.clear();
        self.length = 0;
    }

    /// Feeds one input value.
    ///
    /// The whole cascade of rule creation, reuse and expansion runs before
    /// this returns. Values at or above [`NONTERMINAL_BASE`] are rejected and
    /// leave the grammar untouched.
    pub fn append(&mut self, value: u32) -> Result<(), GrammarError> {
        if value >= NONTERMINAL_BASE {
            return Err(GrammarError::ReservedValue { value });
        }
        self.grammar.append_terminal(value);
        self.length += 1;
        Ok(())
    }

    /// Appends every value in order, stopping at the first rejected one.
    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) -> Result<(), GrammarError> {
        for value in iter {
            self.append(value)?;
        }
        Ok(())
    }

    /// Appends each character of `text` as its Unicode scalar value.
    pub fn append_str(&mut self, text: &str) -> Result<(), GrammarError> {
        self.extend(text.chars().map(u32::from))
    }

    /// Returns the number of values appended.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if no values have been appended.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns compression statistics.
    pub fn stats(&self) -> CompressionStats {
        let grammar_symbols = self
            .grammar
            .rules
            .keys()
            .map(|rule| self.grammar.body(rule).count())
            .sum();

        CompressionStats {
            input_length: self.length,
            grammar_symbols,
            num_rules: self.grammar.rules.len(),
        }
    }
}

/// Statistics about the compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Number of input values appended
    pub input_length: usize,
    /// Total content symbols across all rules
    pub grammar_symbols: usize,
    /// Number of live rules, root included
    pub num_rules: usize,
}

impl CompressionStats {
    /// Returns the grammar size as a percentage of the input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_length == 0 {
            0.0
        } else {
            (self.grammar_symbols as f64 / self.input_length as f64) * 100.0
        }
    }
}

impl Default for Sequitur {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Sequitur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
