use crate::grammar::Grammar;
use crate::symbol::{nonterminal_code, RuleKey, Symbol, SymbolKey, SymbolNode};

/// A production: a circular body of symbols anchored at one guard.
#[derive(Debug)]
pub(crate) struct Rule {
    /// Monotonic identity; the source of the rule's nonterminal code.
    pub id: u32,
    pub guard: SymbolKey,
    /// Number of nonterminals anywhere in the grammar that reference this rule.
    pub count: u32,
}

impl Grammar {
    /// Allocates an empty rule together with its guard.
    pub(crate) fn new_rule(&mut self) -> RuleKey {
        let id = self.next_rule_id;
        self.next_rule_id += 1;

        let symbols = &mut self.symbols;
        let rule = self.rules.insert_with_key(|rule| {
            let guard = symbols.insert_with_key(|guard| SymbolNode {
                symbol: Symbol::Guard { rule },
                prev: Some(guard),
                next: Some(guard),
            });
            Rule { id, guard, count: 0 }
        });

        log::trace!("created rule #{id}");
        rule
    }

    /// Releases a rule and its guard. The body must already be detached.
    pub(crate) fn free_rule(&mut self, rule: RuleKey) {
        let Some(removed) = self.rules.remove(rule) else {
            panic!("rule freed twice");
        };
        assert!(
            self.symbols.remove(removed.guard).is_some(),
            "rule guard already released"
        );
        log::trace!("released rule #{}", removed.id);
    }

    /// First content symbol, or the guard when the body is empty.
    #[inline]
    pub(crate) fn first(&self, rule: RuleKey) -> SymbolKey {
        self.next(self.rules[rule].guard)
    }

    /// Last content symbol, or the guard when the body is empty.
    #[inline]
    pub(crate) fn last(&self, rule: RuleKey) -> SymbolKey {
        self.prev(self.rules[rule].guard)
    }

    /// Creates an unlinked nonterminal for `rule` and counts the new use.
    pub(crate) fn new_nonterminal(&mut self, rule: RuleKey) -> SymbolKey {
        let target = &mut self.rules[rule];
        target.count += 1;
        let code = nonterminal_code(target.id);
        self.symbols
            .insert(SymbolNode::new(Symbol::NonTerminal { code, rule }))
    }

    pub(crate) fn new_terminal(&mut self, value: u32) -> SymbolKey {
        self.symbols
            .insert(SymbolNode::new(Symbol::Terminal { value }))
    }

    /// Creates an unlinked copy of the symbol at `key`.
    ///
    /// Copying a nonterminal is a new use of its rule, so the rule's usage
    /// count goes up by one. Guards are never copied.
    pub(crate) fn duplicate(&mut self, key: SymbolKey) -> SymbolKey {
        match self.symbols[key].symbol {
            Symbol::Terminal { value } => self.new_terminal(value),
            Symbol::NonTerminal { rule, .. } => self.new_nonterminal(rule),
            Symbol::Guard { .. } => panic!("guard duplicated as rule content"),
        }
    }

    /// Rule owning the guard at `key`.
    #[inline]
    pub(crate) fn guard_rule(&self, key: SymbolKey) -> RuleKey {
        match self.symbols[key].symbol {
            Symbol::Guard { rule } => rule,
            _ => panic!("expected a guard"),
        }
    }

    /// Drops one use of the rule referenced by the nonterminal at `key`.
    pub(crate) fn release_use(&mut self, key: SymbolKey) {
        let Some(rule) = self.symbols[key].symbol.referenced_rule() else {
            panic!("released a use through a symbol that is not a nonterminal");
        };
        let target = &mut self.rules[rule];
        assert!(target.count > 0, "usage count underflow");
        target.count -= 1;
    }

    /// True when `first` and its successor make up the entire body of a rule.
    ///
    /// Returns that rule.
    pub(crate) fn complete_rule(&self, first: SymbolKey) -> Option<RuleKey> {
        let prev = self.prev(first);
        if !self.symbols[prev].symbol.is_guard() {
            return None;
        }
        let after = self.next(self.next(first));
        if after != prev {
            return None;
        }
        Some(self.guard_rule(prev))
    }
}
