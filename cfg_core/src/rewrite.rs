//! Grammar rewrites shared by the CNF and GNF pipelines: DEL-epsilon and
//! UNIT (spec §4.8, §4.9).

use std::collections::{HashMap, HashSet};

use crate::analysis;
use crate::grammar::{Grammar, NonTerminal, ProductionBody};
use crate::symbol::Symbol;

/// DEL-epsilon: removes epsilon productions, replacing every rule with
/// the power-set of elisions of its nullable positions. The empty body
/// survives only for the start symbol.
pub fn del_epsilon(g: &Grammar) -> Grammar {
    let null = analysis::nullable(g);
    let start = g.start().clone();
    let mut out = Grammar::new(start.clone());

    for (lhs, bodies) in g.rules() {
        for body in bodies {
            if body.is_empty() {
                if *lhs == start {
                    out.add_body(lhs.clone(), Vec::new());
                }
                continue;
            }
            for combo in elisions(body, &null) {
                if combo.is_empty() && *lhs != start {
                    continue;
                }
                out.add_body(lhs.clone(), combo);
            }
        }
    }
    out.dedup();
    out
}

/// Every way of eliding a subset of `body`'s nullable-non-terminal
/// positions, including the identity (no elision).
fn elisions(body: &[Symbol], null: &HashSet<NonTerminal>) -> Vec<ProductionBody> {
    let nullable_positions: Vec<usize> = body
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            Symbol::NonTerminal(n) if null.contains(n) => Some(i),
            _ => None,
        })
        .collect();

    let mut out = Vec::new();
    let bits = nullable_positions.len();
    for mask in 0..(1u32 << bits) {
        let mut combo = Vec::with_capacity(body.len());
        for (i, s) in body.iter().enumerate() {
            if let Some(bit) = nullable_positions.iter().position(|&p| p == i) {
                if (mask >> bit) & 1 == 1 {
                    continue;
                }
            }
            combo.push(s.clone());
        }
        out.push(combo);
    }
    out
}

/// UNIT: removes unit productions `A -> B` by replacing each
/// non-terminal's rule set with the union of the non-unit bodies of
/// every non-terminal reachable from it through the unit graph.
pub fn unit(g: &Grammar) -> Grammar {
    let mut out = Grammar::new(g.start().clone());

    let mut adjacency: HashMap<NonTerminal, Vec<NonTerminal>> = HashMap::new();
    for (lhs, bodies) in g.rules() {
        for body in bodies {
            if let [Symbol::NonTerminal(b)] = body.as_slice() {
                adjacency.entry(lhs.clone()).or_default().push(b.clone());
            }
        }
    }

    for a in g.non_terminals() {
        let closure = unit_closure(a, &adjacency);
        for b in &closure {
            let Some(bodies) = g.bodies_of(b) else {
                continue;
            };
            for body in bodies {
                let is_unit = matches!(body.as_slice(), [Symbol::NonTerminal(_)]);
                if !is_unit {
                    out.add_body(a.clone(), body.clone());
                }
            }
        }
    }
    out.dedup();
    out
}

/// The reflexive transitive closure of the unit graph starting at `a`.
fn unit_closure(
    a: &NonTerminal,
    adjacency: &HashMap<NonTerminal, Vec<NonTerminal>>,
) -> Vec<NonTerminal> {
    let mut closure = vec![a.clone()];
    let mut seen: HashSet<NonTerminal> = HashSet::from([a.clone()]);
    let mut i = 0;
    while i < closure.len() {
        let cur = closure[i].clone();
        i += 1;
        if let Some(neighbors) = adjacency.get(&cur) {
            for n in neighbors {
                if seen.insert(n.clone()) {
                    closure.push(n.clone());
                }
            }
        }
    }
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;

    #[test]
    fn del_epsilon_distributes_nullable_elisions() {
        let g = io::parse("S : AB\nA : a | E\nB : b | E\n").unwrap();
        let out = del_epsilon(&g);
        let bodies = out.bodies_of("S").unwrap();
        let rendered: HashSet<String> = bodies
            .iter()
            .map(|b| b.iter().map(Symbol::to_string).collect())
            .collect();
        assert!(rendered.contains("AB"));
        assert!(rendered.contains("A"));
        assert!(rendered.contains("B"));
        // S is the start symbol and is itself nullable here, so S -> ε
        // must survive DEL-epsilon.
        assert!(rendered.contains(""));
    }

    #[test]
    fn del_epsilon_drops_empty_body_for_non_start() {
        let g = io::parse("S : A\nA : a | E\n").unwrap();
        let out = del_epsilon(&g);
        for body in out.bodies_of("A").unwrap() {
            assert!(!body.is_empty());
        }
    }

    #[test]
    fn unit_removes_chains() {
        let g = io::parse("S : A\nA : B\nB : b\n").unwrap();
        let out = unit(&g);
        assert_eq!(
            out.bodies_of("S").unwrap(),
            &[vec![Symbol::Terminal('b')]]
        );
    }
}
