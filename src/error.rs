use crate::symbol::NONTERMINAL_BASE;
use std::fmt;

/// Errors reported by the grammar engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarError {
    /// The value lies in the range reserved for nonterminal codes.
    ReservedValue { value: u32 },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::ReservedValue { value } => write!(
                f,
                "value {value:#x} is reserved for nonterminals (terminals must be below {NONTERMINAL_BASE:#x})"
            ),
        }
    }
}

impl std::error::Error for GrammarError {}
