//! Fixpoint computations over a grammar snapshot: nullable, reachable,
//! productive, plus FIRST/FOLLOW sets used only for diagnostics.
//!
//! These are pure functions, not mutating methods on `Grammar`, so every
//! pipeline stage can re-run the analysis fresh against its current
//! grammar rather than trying to keep a cached answer in sync as rules
//! are rewritten out from under it.

use std::collections::{HashMap, HashSet};

use crate::grammar::{Grammar, NonTerminal};
use crate::symbol::Symbol;

/// Non-terminals that can derive the empty string.
pub fn nullable(g: &Grammar) -> HashSet<NonTerminal> {
    let mut null: HashSet<NonTerminal> = HashSet::new();
    loop {
        let mut changed = false;
        for (lhs, bodies) in g.rules() {
            if null.contains(lhs) {
                continue;
            }
            let is_nullable = bodies.iter().any(|body| {
                body.is_empty()
                    || body.iter().all(|s| match s {
                        Symbol::NonTerminal(n) => null.contains(n),
                        Symbol::Terminal(_) => false,
                    })
            });
            if is_nullable {
                null.insert(lhs.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    null
}

/// Non-terminals reachable from the start symbol.
pub fn reachable(g: &Grammar) -> HashSet<NonTerminal> {
    let mut reach: HashSet<NonTerminal> = HashSet::new();
    reach.insert(g.start().clone());
    loop {
        let mut changed = false;
        let frontier: Vec<NonTerminal> = reach.iter().cloned().collect();
        for a in frontier {
            let Some(bodies) = g.bodies_of(&a) else {
                continue;
            };
            for body in bodies {
                for s in body {
                    if let Symbol::NonTerminal(n) = s {
                        if reach.insert(n.clone()) {
                            changed = true;
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    reach
}

/// Non-terminals that derive at least one terminal string (co-accessible).
pub fn productive(g: &Grammar) -> HashSet<NonTerminal> {
    let null = nullable(g);
    let mut prod: HashSet<NonTerminal> = HashSet::new();
    loop {
        let mut changed = false;
        for (lhs, bodies) in g.rules() {
            if prod.contains(lhs) {
                continue;
            }
            let is_productive = bodies.iter().any(|body| {
                body.iter().all(|s| match s {
                    Symbol::Terminal(_) => true,
                    Symbol::NonTerminal(n) => prod.contains(n) || null.contains(n),
                })
            });
            if is_productive {
                prod.insert(lhs.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    prod
}

/// FIRST(A) for every non-terminal A, with `None` standing in for
/// epsilon. Diagnostic only; no pipeline stage depends on it.
pub fn first_sets(g: &Grammar) -> HashMap<NonTerminal, HashSet<Option<char>>> {
    let mut first: HashMap<NonTerminal, HashSet<Option<char>>> =
        g.non_terminals().map(|n| (n.clone(), HashSet::new())).collect();

    loop {
        let mut changed = false;
        for (lhs, bodies) in g.rules() {
            for body in bodies {
                let computed = first_of_sequence(body, &first);
                let entry = first.entry(lhs.clone()).or_default();
                for x in computed {
                    if entry.insert(x) {
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    first
}

/// FIRST of a symbol sequence, given the first sets computed so far.
fn first_of_sequence(
    body: &[Symbol],
    first: &HashMap<NonTerminal, HashSet<Option<char>>>,
) -> HashSet<Option<char>> {
    let mut set = HashSet::new();

    if body.is_empty() {
        set.insert(None);
        return set;
    }

    match &body[0] {
        Symbol::Terminal(c) => {
            set.insert(Some(*c));
        }
        Symbol::NonTerminal(n) => {
            let fi_n = first.get(n).cloned().unwrap_or_default();
            if !fi_n.contains(&None) {
                set.extend(fi_n);
            } else {
                set.extend(fi_n.into_iter().filter(Option::is_some));
                set.extend(first_of_sequence(&body[1..], first));
            }
        }
    }
    set
}

/// FOLLOW(A) for every non-terminal A, given the already-computed FIRST
/// sets. Diagnostic only.
pub fn follow_sets(
    g: &Grammar,
    first: &HashMap<NonTerminal, HashSet<Option<char>>>,
) -> HashMap<NonTerminal, HashSet<char>> {
    let mut follow: HashMap<NonTerminal, HashSet<char>> =
        g.non_terminals().map(|n| (n.clone(), HashSet::new())).collect();

    loop {
        let mut changed = false;
        for (lhs, bodies) in g.rules() {
            for body in bodies {
                for (i, s) in body.iter().enumerate() {
                    let Symbol::NonTerminal(n) = s else {
                        continue;
                    };
                    let rest_first = first_of_sequence(&body[i + 1..], first);

                    for c in rest_first.iter().flatten().copied() {
                        if follow.entry(n.clone()).or_default().insert(c) {
                            changed = true;
                        }
                    }

                    if rest_first.contains(&None) {
                        let lhs_follow: Vec<char> =
                            follow.get(lhs).cloned().unwrap_or_default().into_iter().collect();
                        for c in lhs_follow {
                            if follow.entry(n.clone()).or_default().insert(c) {
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;

    #[test]
    fn nullable_detects_direct_and_transitive_epsilon() {
        let g = io::parse("S : AB\nA : a | E\nB : b | E\n").unwrap();
        let null = nullable(&g);
        assert!(null.contains("A"));
        assert!(null.contains("B"));
        assert!(null.contains("S"));
    }

    #[test]
    fn reachable_excludes_unused_nonterminals() {
        let g = io::parse("S : a\nX : b\n").unwrap();
        let reach = reachable(&g);
        assert!(reach.contains("S"));
        assert!(!reach.contains("X"));
    }

    #[test]
    fn productive_excludes_dead_nonterminals() {
        let g = io::parse("S : A\nA : A\n").unwrap();
        let prod = productive(&g);
        assert!(!prod.contains("A"));
        assert!(!prod.contains("S"));
    }
}
