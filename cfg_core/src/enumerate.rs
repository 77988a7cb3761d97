//! Bounded breadth-first enumeration of the terminal strings a grammar
//! derives (spec §4.12).
//!
//! The leftmost-non-terminal expansion discipline is load-bearing: without
//! it, the same derivable word is reached through exponentially many
//! distinct sentential forms, and the seen-set stops doing its job.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::analysis;
use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// A sentential form: an intermediate sequence of terminals and
/// non-terminals during derivation.
type SententialForm = Vec<Symbol>;

/// All terminal strings of length <= `bound` derivable from `g`'s start
/// symbol, sorted lexicographically. The empty word (epsilon) is
/// included when the start symbol is nullable.
///
/// Never fails; a grammar with no useful rules simply yields an empty
/// set.
pub fn enumerate(g: &Grammar, bound: usize) -> BTreeSet<String> {
    let mut words = BTreeSet::new();

    if bound == 0 {
        // The general BFS's anti-explosion cutoff (|form| > 2 * bound)
        // would reject the one-symbol start form before it ever gets a
        // chance to expand, so length zero is handled directly: the only
        // possible output is epsilon, and only if the start is nullable.
        if g.contains(g.start()) && analysis::nullable(g).contains(g.start()) {
            words.insert(String::new());
        }
        return words;
    }

    let mut seen: HashSet<SententialForm> = HashSet::new();
    let mut frontier: VecDeque<SententialForm> = VecDeque::new();

    let start_form = vec![Symbol::NonTerminal(g.start().clone())];
    seen.insert(start_form.clone());
    frontier.push_back(start_form);

    while let Some(form) = frontier.pop_front() {
        let terminal_count = form.iter().filter(|s| s.is_terminal()).count();
        if terminal_count > bound {
            continue;
        }
        if form.len() > 2 * bound {
            continue;
        }

        match form.iter().position(Symbol::is_non_terminal) {
            None => {
                let word: String = form.iter().map(Symbol::to_string).collect();
                if word.len() <= bound {
                    words.insert(word);
                }
            }
            Some(idx) => {
                let Symbol::NonTerminal(name) = &form[idx] else {
                    unreachable!("position located by is_non_terminal")
                };
                let Some(bodies) = g.bodies_of(name) else {
                    continue;
                };
                for body in bodies {
                    let mut next = form[..idx].to_vec();
                    next.extend(body.iter().cloned());
                    next.extend_from_slice(&form[idx + 1..]);
                    if seen.insert(next.clone()) {
                        frontier.push_back(next);
                    }
                }
            }
        }
    }

    words
}
