use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a symbol slot in the grammar arena.
    pub(crate) struct SymbolKey;

    /// Stable handle to a rule slot in the grammar arena.
    pub(crate) struct RuleKey;
}

/// First code reserved for nonterminals.
///
/// Terminal values must stay below this so that digram signatures never
/// confuse a literal with a rule reference. Every Unicode scalar value fits.
pub const NONTERMINAL_BASE: u32 = 0x0100_0000;

/// Code carried by guards. Never part of a digram.
pub(crate) const GUARD_CODE: u64 = u64::MAX;

/// Symbol kinds in the grammar.
///
/// Only three shapes exist, so behaviour is dispatched with `match` rather
/// than through a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    /// A literal input value.
    Terminal { value: u32 },

    /// A reference to a rule. `code` is the rule's synthetic digram code.
    NonTerminal { code: u64, rule: RuleKey },

    /// Sentinel that closes a rule's circular body.
    Guard { rule: RuleKey },
}

impl Symbol {
    /// Code used when this symbol takes part in a digram signature.
    #[inline]
    pub(crate) fn code(&self) -> u64 {
        match *self {
            Symbol::Terminal { value } => u64::from(value),
            Symbol::NonTerminal { code, .. } => code,
            Symbol::Guard { .. } => GUARD_CODE,
        }
    }

    #[inline]
    pub(crate) fn is_guard(&self) -> bool {
        matches!(self, Symbol::Guard { .. })
    }

    #[inline]
    pub(crate) fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal { .. })
    }

    /// Rule this symbol refers to, if it is a nonterminal.
    #[inline]
    pub(crate) fn referenced_rule(&self) -> Option<RuleKey> {
        match *self {
            Symbol::NonTerminal { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

/// Synthetic code for a nonterminal pointing at the rule with `rule_id`.
#[inline]
pub(crate) fn nonterminal_code(rule_id: u32) -> u64 {
    u64::from(NONTERMINAL_BASE) + u64::from(rule_id)
}

/// A slot in the doubly linked, per-rule circular list.
///
/// `prev`/`next` are `None` only while a node is being spliced in or out.
#[derive(Debug)]
pub(crate) struct SymbolNode {
    pub symbol: Symbol,
    pub prev: Option<SymbolKey>,
    pub next: Option<SymbolKey>,
}

impl SymbolNode {
    pub(crate) fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            prev: None,
            next: None,
        }
    }
}
