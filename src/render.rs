//! Human-readable listing of the grammar.
//!
//! Rules are numbered breadth-first from the root in the order they are
//! first referenced, so the numbering depends only on the grammar's shape and
//! never on the internal rule identities.

use crate::sequitur::Sequitur;
use crate::symbol::{RuleKey, Symbol};
use ahash::AHashMap as HashMap;
use std::collections::VecDeque;
use std::fmt::Write;

/// One symbol of a listed rule body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Terminal(u32),
    /// Reference to the rule at this position in the listing.
    Rule(usize),
}

/// A rule as it appears in [`Sequitur::listing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedRule {
    /// How many nonterminals reference this rule. Always 0 for the root.
    pub usage: u32,
    /// Number of terminals the rule expands to.
    pub expanded_len: usize,
    pub body: Vec<Element>,
}

impl Sequitur {
    /// Breadth-first enumeration of the live grammar, root first.
    pub fn listing(&self) -> Vec<ListedRule> {
        let grammar = &self.grammar;
        let mut assigned = 1;
        let mut numbering: HashMap<RuleKey, usize> = HashMap::new();
        numbering.insert(grammar.root, 0);

        let mut listed = Vec::new();
        let mut queue: VecDeque<RuleKey> = VecDeque::from([grammar.root]);

        while let Some(rule) = queue.pop_front() {
            let body = grammar
                .body(rule)
                .map(|key| match grammar.symbols[key].symbol {
                    Symbol::Terminal { value } => Element::Terminal(value),
                    Symbol::NonTerminal { rule: target, .. } => {
                        let index = *numbering.entry(target).or_insert_with(|| {
                            queue.push_back(target);
                            assigned += 1;
                            assigned - 1
                        });
                        Element::Rule(index)
                    }
                    Symbol::Guard { .. } => unreachable!("guard inside a rule body"),
                })
                .collect();

            listed.push(ListedRule {
                usage: grammar.rules[rule].count,
                expanded_len: 0,
                body,
            });
        }

        fill_expanded_lengths(&mut listed);
        listed
    }

    /// Renders the grammar, one rule per line, with usage counts.
    pub fn render(&self) -> String {
        render_listing(&self.listing(), false)
    }

    /// Like [`Sequitur::render`], with each rule's expanded length appended.
    pub fn render_with_lengths(&self) -> String {
        render_listing(&self.listing(), true)
    }
}

/// Post-order over the rule graph, with an explicit stack. A rule may refer
/// to one listed before it, so listing order alone is not enough.
fn fill_expanded_lengths(listed: &mut [ListedRule]) {
    let mut done = vec![false; listed.len()];

    for start in 0..listed.len() {
        let mut stack = vec![start];
        while let Some(&index) = stack.last() {
            if done[index] {
                stack.pop();
                continue;
            }

            let pending: Vec<usize> = listed[index]
                .body
                .iter()
                .filter_map(|element| match *element {
                    Element::Rule(child) if !done[child] => Some(child),
                    _ => None,
                })
                .collect();

            if pending.is_empty() {
                let len: usize = listed[index]
                    .body
                    .iter()
                    .map(|element| match *element {
                        Element::Terminal(_) => 1,
                        Element::Rule(child) => listed[child].expanded_len,
                    })
                    .sum();
                listed[index].expanded_len = len;
                done[index] = true;
                stack.pop();
            } else {
                stack.extend(pending);
            }
        }
    }
}

fn render_listing(listed: &[ListedRule], with_lengths: bool) -> String {
    let mut out = String::from("Usage\tRule\n");

    for (index, rule) in listed.iter().enumerate() {
        let _ = write!(out, " {}\tR{} ->", rule.usage, index);
        for element in &rule.body {
            out.push(' ');
            match *element {
                Element::Terminal(value) => push_terminal(&mut out, value),
                Element::Rule(child) => {
                    let _ = write!(out, "R{child}");
                }
            }
        }
        if with_lengths {
            let _ = write!(out, "\t({})", rule.expanded_len);
        }
        out.push('\n');
    }

    out
}

/// Writes a terminal so that it cannot be confused with the listing syntax.
fn push_terminal(out: &mut String, value: u32) {
    match char::from_u32(value) {
        Some(' ') => out.push('_'),
        Some('\n') => out.push_str("\\n"),
        Some('\t') => out.push_str("\\t"),
        Some('\r') => out.push_str("\\r"),
        Some(c @ ('\\' | '(' | ')' | '_' | '0'..='9')) => {
            out.push('\\');
            out.push(c);
        }
        Some(c) if !c.is_control() => out.push(c),
        _ => {
            let _ = write!(out, "[{value}]");
        }
    }
}
