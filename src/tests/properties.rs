use crate::config::SequiturConfig;
use crate::digram::Digram;
use crate::sequitur::Sequitur;
use crate::symbol::{RuleKey, SymbolKey};
use crate::Element;
use ahash::AHashMap as HashMap;
use proptest::prelude::*;

fn build(input: &[u32]) -> Sequitur {
    let mut seq = Sequitur::new();
    seq.extend(input.iter().copied()).unwrap();
    seq
}

/// Every occurrence of every digram across the whole grammar.
fn digram_occurrences(seq: &Sequitur) -> HashMap<Digram, Vec<SymbolKey>> {
    let grammar = &seq.grammar;
    let mut occurrences: HashMap<Digram, Vec<SymbolKey>> = HashMap::new();

    for rule in grammar.rules.keys() {
        for key in grammar.body(rule) {
            if let Some(digram) = grammar.digram_at(key) {
                occurrences.entry(digram).or_default().push(key);
            }
        }
    }

    occurrences
}

/// Fails if two occurrences of a digram exist that do not overlap.
fn check_digram_uniqueness(seq: &Sequitur) -> Result<(), String> {
    let grammar = &seq.grammar;

    for (digram, keys) in digram_occurrences(seq) {
        for (i, &a) in keys.iter().enumerate() {
            for &b in &keys[i + 1..] {
                let overlapping = grammar.next(a) == b || grammar.next(b) == a;
                if !overlapping {
                    return Err(format!("digram {digram:?} occurs twice"));
                }
            }
        }
    }

    Ok(())
}

/// Fails on a stale witness or on a live digram the index does not know.
fn check_index_consistency(seq: &Sequitur) -> Result<(), String> {
    let grammar = &seq.grammar;
    let occurrences = digram_occurrences(seq);

    for (digram, keys) in &occurrences {
        match grammar.digrams.lookup(*digram) {
            Some(witness) if keys.contains(&witness) => {}
            other => return Err(format!("digram {digram:?} indexed as {other:?}")),
        }
    }
    for (digram, witness) in grammar.digrams.iter() {
        if !grammar.symbols.contains_key(*witness) {
            return Err(format!("digram {digram:?} has a released witness"));
        }
        if grammar.digram_at(*witness) != Some(*digram) {
            return Err(format!("digram {digram:?} has a stale witness"));
        }
    }

    Ok(())
}

/// Fails if a rule is underused or its count disagrees with the grammar.
fn check_rule_utility(seq: &Sequitur) -> Result<(), String> {
    let grammar = &seq.grammar;
    let mut references: HashMap<RuleKey, u32> = HashMap::new();

    for rule in grammar.rules.keys() {
        for key in grammar.body(rule) {
            if let Some(target) = grammar.symbols[key].symbol.referenced_rule() {
                *references.entry(target).or_default() += 1;
            }
        }
    }

    for (key, rule) in &grammar.rules {
        if key == grammar.root {
            continue;
        }
        let actual = references.get(&key).copied().unwrap_or(0);
        if rule.count != actual {
            return Err(format!(
                "rule #{} counts {} uses but has {}",
                rule.id, rule.count, actual
            ));
        }
        if rule.count < 2 {
            return Err(format!("rule #{} used only {} times", rule.id, rule.count));
        }
    }

    Ok(())
}

fn check_all(seq: &Sequitur, input: &[u32]) -> Result<(), String> {
    let reconstructed: Vec<u32> = seq.iter().collect();
    if reconstructed != input {
        return Err(format!("round trip gave {reconstructed:?}"));
    }
    check_digram_uniqueness(seq)?;
    check_index_consistency(seq)?;
    check_rule_utility(seq)
}

/// Small alphabets force deep cascades of rule creation and expansion.
fn small_alphabet() -> impl Strategy<Value = Vec<u32>> {
    (1u32..5).prop_flat_map(|size| prop::collection::vec(0..size, 0..200))
}

proptest! {
    /// Property 1: Roundtrip fidelity
    #[test]
    fn prop_roundtrip(input: Vec<u8>) {
        let input: Vec<u32> = input.into_iter().map(u32::from).collect();
        let seq = build(&input);

        let reconstructed: Vec<u32> = seq.iter().collect();
        prop_assert_eq!(reconstructed, input.clone());
        prop_assert_eq!(seq.len(), input.len());
        prop_assert_eq!(seq.listing()[0].expanded_len, input.len());
    }

    /// Property 2: both invariants hold after every single append
    #[test]
    fn prop_invariants_after_each_append(input in small_alphabet()) {
        let mut seq = Sequitur::new();
        for (i, &value) in input.iter().enumerate() {
            seq.append(value).unwrap();
            if let Err(message) = check_all(&seq, &input[..=i]) {
                prop_assert!(false, "after {} values: {}", i + 1, message);
            }
        }
    }

    /// Property 3: rule utility on byte input
    #[test]
    fn prop_rule_utility(input: Vec<u8>) {
        let input: Vec<u32> = input.into_iter().map(u32::from).collect();
        let seq = build(&input);
        prop_assert_eq!(check_rule_utility(&seq), Ok(()));
    }

    /// Property 4: rendering does not change the grammar
    #[test]
    fn prop_render_idempotent(input in small_alphabet()) {
        let seq = build(&input);
        let first = seq.render();
        let second = seq.render();
        prop_assert_eq!(first, second);
        prop_assert_eq!(seq.iter().collect::<Vec<_>>(), input);
    }

    /// Property 5: chunking the input never changes the resulting grammar
    #[test]
    fn prop_chunking_is_irrelevant(
        input in small_alphabet(),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let one_by_one = {
            let mut seq = Sequitur::new();
            for &value in &input {
                seq.append(value).unwrap();
            }
            seq
        };

        let mut points: Vec<usize> = cuts.iter().map(|cut| cut.index(input.len() + 1)).collect();
        points.push(0);
        points.push(input.len());
        points.sort_unstable();

        let mut chunked = Sequitur::new();
        for window in points.windows(2) {
            chunked.extend(input[window[0]..window[1]].iter().copied()).unwrap();
        }

        prop_assert_eq!(one_by_one.listing(), chunked.listing());
        prop_assert_eq!(one_by_one.render(), chunked.render());
    }

    /// Property 6: a reset engine behaves exactly like a fresh one
    #[test]
    fn prop_reset_matches_fresh(before in small_alphabet(), after in small_alphabet()) {
        let mut reused = build(&before);
        reused.reset();
        reused.extend(after.iter().copied()).unwrap();

        let fresh = build(&after);
        prop_assert_eq!(reused.render(), fresh.render());
        prop_assert_eq!(reused.stats(), fresh.stats());
    }

    /// Property 7: no rule ever spans the delimiter
    #[test]
    fn prop_delimiter_never_in_rules(input in small_alphabet()) {
        let mut seq = Sequitur::with_config(SequiturConfig::new().with_delimiter(0));
        seq.extend(input.iter().copied()).unwrap();

        prop_assert_eq!(seq.iter().collect::<Vec<_>>(), input);
        prop_assert_eq!(check_digram_uniqueness(&seq), Ok(()));
        prop_assert_eq!(check_rule_utility(&seq), Ok(()));
        for rule in seq.listing().iter().skip(1) {
            prop_assert!(!rule.body.contains(&Element::Terminal(0)));
        }
    }
}

/// Bolero fuzz test: No panics on arbitrary input
#[test]
fn fuzz_no_panic() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        let input: Vec<u32> = input.iter().copied().map(u32::from).collect();
        let seq = build(&input);

        let _ = seq.render();
        let _ = seq.stats();
        let reconstructed: Vec<u32> = seq.iter().collect();
        assert_eq!(reconstructed, input);
    });
}

/// Bolero fuzz test: both invariants always hold
#[test]
fn fuzz_invariants() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        // Fold onto a tiny alphabet so repetitions are common.
        let input: Vec<u32> = input.iter().map(|&b| u32::from(b % 3)).collect();
        let seq = build(&input);
        if let Err(message) = check_all(&seq, &input) {
            panic!("{message}");
        }
    });
}

mod unit_tests {
    use super::*;

    fn chars(text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    #[test]
    fn test_abcabc_grammar() {
        let seq = build(&chars("abcabc"));
        let listing = seq.listing();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].body, vec![Element::Rule(1), Element::Rule(1)]);
        assert_eq!(
            listing[1].body,
            chars("abc").into_iter().map(Element::Terminal).collect::<Vec<_>>()
        );
        assert_eq!(listing[1].usage, 2);
    }

    #[test]
    fn test_aaaa_grammar() {
        let input = chars("aaaa");
        let seq = build(&input);

        assert_eq!(check_all(&seq, &input), Ok(()));
        let listing = seq.listing();
        assert_eq!(listing[0].body, vec![Element::Rule(1), Element::Rule(1)]);
        assert_eq!(listing[1].usage, 2);
    }

    #[test]
    fn test_empty_render() {
        let seq = Sequitur::new();
        let listing = seq.listing();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].body.is_empty());
        assert_eq!(seq.render(), "Usage\tRule\n 0\tR0 ->\n");
    }

    // Overlapping occurrences share a symbol; only one of them may be
    // replaced, and the survivor must stay findable in the index.

    #[test]
    fn test_overlapping_run_of_three() {
        let input = chars("aaa");
        let seq = build(&input);
        assert_eq!(check_all(&seq, &input), Ok(()));
        assert_eq!(seq.stats().num_rules, 1);
    }

    #[test]
    fn test_overlapping_run_then_repeat() {
        let input = chars("abbbabcbb");
        let mut seq = Sequitur::new();
        for (i, &value) in input.iter().enumerate() {
            seq.append(value).unwrap();
            assert_eq!(check_all(&seq, &input[..=i]), Ok(()), "after {} values", i + 1);
        }
    }

    #[test]
    fn test_long_runs() {
        for len in 0..40 {
            let input = vec![9; len];
            let seq = build(&input);
            assert_eq!(check_all(&seq, &input), Ok(()), "run of {len}");
        }
    }

    #[test]
    fn test_nested_rules() {
        let input = chars("abcabcabcabc");
        let seq = build(&input);
        assert!(seq.stats().num_rules > 2, "should have created nested rules");
        assert_eq!(check_all(&seq, &input), Ok(()));
    }

    #[test]
    fn test_all_rules_used_twice() {
        let input = chars("abracadabra abracadabra");
        let seq = build(&input);
        assert_eq!(check_all(&seq, &input), Ok(()));
    }

    #[test]
    fn test_nursery_rhyme() {
        let input = chars(
            "pease porridge hot,\npease porridge cold,\npease porridge in the pot,\nnine days old.\n\n\
             some like it hot,\nsome like it cold,\nsome like it in the pot,\nnine days old.\n",
        );
        let seq = build(&input);
        assert_eq!(check_all(&seq, &input), Ok(()));
        assert!(seq.stats().grammar_symbols < input.len());
    }
}
