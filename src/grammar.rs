use crate::config::SequiturConfig;
use crate::digram::DigramIndex;
use crate::rule::Rule;
use crate::symbol::{RuleKey, SymbolKey, SymbolNode};
use slotmap::SlotMap;

/// Grammar storage and the digram-uniqueness / rule-utility machinery.
///
/// Every piece of mutable state the algorithm touches lives here, so two
/// instances never share anything.
#[derive(Debug)]
pub(crate) struct Grammar {
    /// Arena of symbol slots; links and index witnesses are keys into it.
    pub symbols: SlotMap<SymbolKey, SymbolNode>,

    /// Live rules. Anything here is reachable from the root.
    pub rules: SlotMap<RuleKey, Rule>,

    /// One witness per digram signature present in the grammar.
    pub digrams: DigramIndex,

    /// Rule 0, the input sequence itself.
    pub root: RuleKey,

    pub config: SequiturConfig,

    pub(crate) next_rule_id: u32,
}

impl Grammar {
    pub(crate) fn new(config: SequiturConfig) -> Self {
        let mut grammar = Self {
            symbols: SlotMap::with_key(),
            rules: SlotMap::with_key(),
            digrams: DigramIndex::new(),
            root: RuleKey::default(),
            config,
            next_rule_id: 0,
        };
        grammar.root = grammar.new_rule();
        grammar
    }

    /// Drops every rule and symbol and starts over with an empty root.
    pub(crate) fn clear(&mut self) {
        self.symbols.clear();
        self.rules.clear();
        self.digrams.clear();
        self.next_rule_id = 0;
        self.root = self.new_rule();
    }

    // ========================================================================
    // Linked list
    // ========================================================================

    #[inline]
    pub(crate) fn next(&self, key: SymbolKey) -> SymbolKey {
        self.symbols[key].next.expect("symbol is not linked")
    }

    #[inline]
    pub(crate) fn prev(&self, key: SymbolKey) -> SymbolKey {
        self.symbols[key].prev.expect("symbol is not linked")
    }

    #[inline]
    pub(crate) fn is_guard(&self, key: SymbolKey) -> bool {
        self.symbols[key].symbol.is_guard()
    }

    /// Links `left` to `right`, dropping the digram that started at `left`.
    fn join(&mut self, left: SymbolKey, right: SymbolKey) {
        if self.symbols[left].next.is_some() {
            self.delete_digram(left);

            // In a run `x x x` only the first of the two overlapping pairs is
            // indexed. If that entry just went away, register the survivor.
            if self.in_run(right) {
                self.reindex(right);
            }
            if self.in_run(left) {
                let before = self.prev(left);
                self.reindex(before);
            }
        }

        self.symbols[left].next = Some(right);
        self.symbols[right].prev = Some(left);
    }

    /// True when `key` is a content symbol between two neighbours with the
    /// same code.
    fn in_run(&self, key: SymbolKey) -> bool {
        let node = &self.symbols[key];
        let (Some(prev), Some(next)) = (node.prev, node.next) else {
            return false;
        };
        if node.symbol.is_guard() {
            return false;
        }
        let code = node.symbol.code();
        self.symbols[prev].symbol.code() == code && self.symbols[next].symbol.code() == code
    }

    fn reindex(&mut self, key: SymbolKey) {
        if let Some(digram) = self.digram_at(key) {
            self.digrams.set(digram, key);
        }
    }

    /// Splices the unlinked symbol `new` in right after `key`.
    pub(crate) fn insert_after(&mut self, key: SymbolKey, new: SymbolKey) {
        let next = self.next(key);
        self.join(new, next);
        self.join(key, new);
    }

    /// Unlinks a content symbol and releases everything it held.
    ///
    /// Purges its index entry and, for a nonterminal, one use of its rule.
    /// Never triggers expansion.
    fn remove_symbol(&mut self, key: SymbolKey) {
        assert!(!self.is_guard(key), "guard removed as content");

        let prev = self.prev(key);
        let next = self.next(key);
        self.join(prev, next);
        self.delete_digram(key);
        if self.symbols[key].symbol.is_nonterminal() {
            self.release_use(key);
        }
        self.symbols.remove(key);
    }

    // ========================================================================
    // Core algorithm
    // ========================================================================

    /// Appends a terminal to the root rule and restores both invariants.
    pub(crate) fn append_terminal(&mut self, value: u32) {
        let last = self.last(self.root);
        let symbol = self.new_terminal(value);
        self.insert_after(last, symbol);
        self.check(last);
    }

    /// Enforces digram uniqueness for the pair starting at `key`.
    ///
    /// Returns `true` if the digram already occurred elsewhere, whether or
    /// not that led to a structural change.
    pub(crate) fn check(&mut self, key: SymbolKey) -> bool {
        let Some(digram) = self.digram_at(key) else {
            return false;
        };

        match self.digrams.lookup(digram) {
            None => {
                self.digrams.insert(digram, key);
                false
            }
            Some(witness) if witness == key => false,
            Some(witness) => {
                // Overlapping occurrences (`x x x`) share a symbol and cannot
                // both be replaced.
                if self.next(witness) != key && self.next(key) != witness {
                    self.match_digram(key, witness);
                }
                true
            }
        }
    }

    /// Resolves two occurrences of the same digram.
    fn match_digram(&mut self, new_occurrence: SymbolKey, existing: SymbolKey) {
        let rule = match self.complete_rule(existing) {
            Some(rule) => {
                log::trace!("reusing rule #{}", self.rules[rule].id);
                self.substitute(new_occurrence, rule);
                rule
            }
            None => {
                let rule = self.new_rule();
                let first = self.duplicate(existing);
                let second = self.duplicate(self.next(existing));
                let guard = self.rules[rule].guard;
                self.insert_after(guard, first);
                self.insert_after(first, second);

                self.substitute(existing, rule);
                self.substitute(new_occurrence, rule);

                let body = self.first(rule);
                self.reindex(body);
                rule
            }
        };

        let first = self.first(rule);
        if let Some(inner) = self.symbols[first].symbol.referenced_rule() {
            if self.rules[inner].count == 1 {
                self.expand(first);
            }
        }
    }

    /// Replaces the digram starting at `key` with a nonterminal for `rule`.
    fn substitute(&mut self, key: SymbolKey, rule: RuleKey) {
        let before = self.prev(key);
        let second = self.next(key);
        self.remove_symbol(key);
        self.remove_symbol(second);

        let nonterminal = self.new_nonterminal(rule);
        self.insert_after(before, nonterminal);

        if !self.check(before) {
            let after = self.next(before);
            self.check(after);
        }
    }

    /// Inlines the body of the rule referenced by `key`, whose only use is
    /// `key` itself, and discards the rule.
    fn expand(&mut self, key: SymbolKey) {
        let Some(rule) = self.symbols[key].symbol.referenced_rule() else {
            panic!("expanded a symbol that is not a nonterminal");
        };
        debug_assert_eq!(self.rules[rule].count, 1);

        let left = self.prev(key);
        let right = self.next(key);
        let first = self.first(rule);
        let last = self.last(rule);
        log::trace!("expanding rule #{}", self.rules[rule].id);

        self.delete_digram(left);
        self.delete_digram(key);

        // Detach everything before releasing slots so no link dangles.
        self.symbols[left].next = None;
        self.symbols[right].prev = None;
        self.symbols[first].prev = None;
        self.symbols[last].next = None;
        self.symbols.remove(key);
        self.free_rule(rule);

        self.join(left, first);
        self.join(last, right);

        // The rule's own digrams move with it; only the seam at the end is new.
        self.check(last);
    }

    /// Content symbols of `rule` in order.
    pub(crate) fn body(&self, rule: RuleKey) -> BodyIter<'_> {
        let guard = self.rules[rule].guard;
        BodyIter {
            grammar: self,
            guard,
            current: self.next(guard),
        }
    }
}

/// Walks a rule body from its first symbol to its guard.
pub(crate) struct BodyIter<'a> {
    grammar: &'a Grammar,
    guard: SymbolKey,
    current: SymbolKey,
}

impl Iterator for BodyIter<'_> {
    type Item = SymbolKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.guard {
            return None;
        }
        let key = self.current;
        self.current = self.grammar.next(key);
        Some(key)
    }
}
