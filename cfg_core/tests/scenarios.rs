//! Integration coverage for the central correctness property (spec §8,
//! property 4): for any bound L <= 6 and input grammar G,
//! `Enumerate(G, L) == Enumerate(CNF(G), L) == Enumerate(GNF(G), L)`,
//! checked against the concrete scenario table.

use cfg_core::{cnf, enumerate, gnf, io, FreshNames};

/// Enumerates a grammar's own form, its CNF, and its GNF, all at `bound`.
fn enumerate_all_forms(text: &str, bound: usize) -> (Vec<String>, Vec<String>, Vec<String>) {
    env_logger::try_init().ok();

    let g = io::parse(text).expect("grammar should parse");
    let plain: Vec<String> = enumerate::enumerate(&g, bound).into_iter().collect();

    let mut cnf_fresh = FreshNames::seeded(g.all_non_terminal_names());
    let chomsky = cnf::normalize(&g, &mut cnf_fresh).expect("CNF is always achievable");
    let cnf_words: Vec<String> = enumerate::enumerate(&chomsky, bound).into_iter().collect();

    let mut gnf_fresh = FreshNames::seeded(g.all_non_terminal_names());
    let greibach =
        gnf::normalize(&g, &mut gnf_fresh).expect("this scenario's grammar should reach GNF");
    let gnf_words: Vec<String> = enumerate::enumerate(&greibach, bound).into_iter().collect();

    (plain, cnf_words, gnf_words)
}

/// Asserts the central equivalence property at every bound from 0..=6.
fn assert_equivalent_up_to_six(text: &str) {
    for bound in 0..=6 {
        let (plain, cnf_words, gnf_words) = enumerate_all_forms(text, bound);
        assert_eq!(
            plain, cnf_words,
            "CNF diverged from the original grammar at bound {bound} for {text:?}"
        );
        assert_eq!(
            plain, gnf_words,
            "GNF diverged from the original grammar at bound {bound} for {text:?}"
        );
    }
}

#[test]
fn scenario_1_anbn_length_three() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : aSb | E\n", 3);
    assert_eq!(plain, vec!["", "ab"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn scenario_2_anbn_length_four() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : aSb | E\n", 4);
    assert_eq!(plain, vec!["", "aabb", "ab"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn scenario_3_concatenation() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : AB\nA : a\nB : b\n", 5);
    assert_eq!(plain, vec!["ab"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn scenario_4_right_recursion() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : aS | a\n", 3);
    assert_eq!(plain, vec!["a", "aa", "aaa"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn scenario_5_both_sides_nullable() {
    let (plain, cnf_words, gnf_words) =
        enumerate_all_forms("S : AB\nA : a | E\nB : b | E\n", 2);
    assert_eq!(plain, vec!["", "a", "ab", "b"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn scenario_6_direct_left_recursion() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : SS | a\n", 3);
    assert_eq!(plain, vec!["a", "aa", "aaa"]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn all_scenarios_hold_up_to_bound_six() {
    assert_equivalent_up_to_six("S : aSb | E\n");
    assert_equivalent_up_to_six("S : AB\nA : a\nB : b\n");
    assert_equivalent_up_to_six("S : aS | a\n");
    assert_equivalent_up_to_six("S : AB\nA : a | E\nB : b | E\n");
    assert_equivalent_up_to_six("S : SS | a\n");
}

#[test]
fn grammar_with_only_epsilon_rule() {
    let (plain, cnf_words, gnf_words) = enumerate_all_forms("S : E\n", 4);
    assert_eq!(plain, vec![""]);
    assert_eq!(plain, cnf_words);
    assert_eq!(plain, gnf_words);
}

#[test]
fn empty_grammar_round_trips_to_empty_language() {
    let g = io::parse("S : A\nA : A\n").expect("grammar should parse");

    let mut cnf_fresh = FreshNames::seeded(g.all_non_terminal_names());
    let chomsky = cnf::normalize(&g, &mut cnf_fresh).unwrap();
    assert!(chomsky.is_empty());
    assert!(enumerate::enumerate(&chomsky, 6).is_empty());
    assert!(enumerate::enumerate(&g, 6).is_empty());
}
