use crate::grammar::Grammar;
use crate::symbol::{Symbol, SymbolKey};
use ahash::AHashMap as HashMap;
use std::collections::hash_map::Entry;

/// Signature of an adjacent pair: the codes of a symbol and its successor.
pub(crate) type Digram = (u64, u64);

/// Maps each digram signature to one symbol that begins an occurrence of it.
#[derive(Debug, Default)]
pub(crate) struct DigramIndex {
    entries: HashMap<Digram, SymbolKey>,
}

impl DigramIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn lookup(&self, digram: Digram) -> Option<SymbolKey> {
        self.entries.get(&digram).copied()
    }

    /// Records `witness` for a signature that has no entry yet.
    #[inline]
    pub(crate) fn insert(&mut self, digram: Digram, witness: SymbolKey) {
        let previous = self.entries.insert(digram, witness);
        debug_assert!(previous.is_none(), "digram already indexed");
    }

    /// Records `witness` regardless of what is stored.
    #[inline]
    pub(crate) fn set(&mut self, digram: Digram, witness: SymbolKey) {
        self.entries.insert(digram, witness);
    }

    /// Removes the entry only if it is stored under exactly `witness`.
    ///
    /// Another occurrence of the same signature indexed under a different
    /// symbol is left alone.
    #[inline]
    pub(crate) fn remove(&mut self, digram: Digram, witness: SymbolKey) -> bool {
        if let Entry::Occupied(e) = self.entries.entry(digram) {
            if *e.get() == witness {
                e.remove();
                return true;
            }
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Digram, &SymbolKey)> {
        self.entries.iter()
    }
}

impl Grammar {
    /// Signature of the digram starting at `key`.
    ///
    /// `None` when either side is a guard or the configured delimiter; such
    /// pairs never enter the index.
    pub(crate) fn digram_at(&self, key: SymbolKey) -> Option<Digram> {
        let node = &self.symbols[key];
        let next = node.next?;
        let first = node.symbol;
        let second = self.symbols[next].symbol;

        if first.is_guard() || second.is_guard() {
            return None;
        }
        if self.is_delimiter(first) || self.is_delimiter(second) {
            return None;
        }

        Some((first.code(), second.code()))
    }

    /// Drops the index entry for the digram starting at `key`, if `key` is
    /// its witness.
    pub(crate) fn delete_digram(&mut self, key: SymbolKey) {
        if let Some(digram) = self.digram_at(key) {
            self.digrams.remove(digram, key);
        }
    }

    #[inline]
    fn is_delimiter(&self, symbol: Symbol) -> bool {
        match (symbol, self.config.delimiter) {
            (Symbol::Terminal { value }, Some(delimiter)) => value == delimiter,
            _ => false,
        }
    }
}
