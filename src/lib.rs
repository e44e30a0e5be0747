//! # Sequitur - Online Grammar Inference
//!
//! Builds a context-free grammar from a sequence of values, one value at a
//! time, such that expanding the root rule reproduces the input exactly and
//! repeated substrings are factored into shared rules.
//!
//! After every appended value the grammar satisfies two constraints:
//! 1. **Digram Uniqueness**: no pair of adjacent symbols occurs twice
//!    (overlapping occurrences inside a run such as `aaa` excepted)
//! 2. **Rule Utility**: every rule other than the root is used at least twice
//!
//! ## Example
//!
//! ```
//! use sequitur_grammar::{Element, Sequitur};
//!
//! let mut seq = Sequitur::new();
//! seq.append_str("abcabc").unwrap();
//!
//! // Reconstructs the original sequence
//! let text: String = seq.iter().filter_map(char::from_u32).collect();
//! assert_eq!(text, "abcabc");
//!
//! // R0 -> R1 R1, R1 -> a b c
//! let listing = seq.listing();
//! assert_eq!(listing[0].body, vec![Element::Rule(1), Element::Rule(1)]);
//! assert_eq!(listing[1].usage, 2);
//!
//! print!("{}", seq.render());
//! ```
//!
//! ## Performance
//!
//! - O(1) amortized time per value appended
//! - Symbols and rules live in generational arenas (SlotMap); links and the
//!   digram index hold stable keys, never pointers
//!
//! An engine is single-threaded and owns all of its state; independent
//! grammars are independent `Sequitur` values.

mod config;
mod digram;
mod error;
mod grammar;
mod iter;
mod render;
mod rule;
mod sequitur;
mod symbol;

#[cfg(test)]
mod tests;

pub use config::SequiturConfig;
pub use error::GrammarError;
pub use iter::SequiturIter;
pub use render::{Element, ListedRule};
pub use sequitur::{CompressionStats, Sequitur};
pub use symbol::NONTERMINAL_BASE;
