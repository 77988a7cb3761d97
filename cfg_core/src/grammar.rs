//! The grammar store: an ordered mapping from non-terminal to its
//! production bodies, plus the distinguished start symbol.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::symbol::Symbol;

/// The name of a non-terminal.
pub type NonTerminal = String;

/// An ordered, possibly-empty sequence of symbols. The empty sequence
/// denotes epsilon.
pub type ProductionBody = Vec<Symbol>;

/// A context-free grammar: a mapping from non-terminal to its ordered,
/// non-empty list of production bodies, and a start symbol.
///
/// Insertion order of non-terminals is preserved so that output is
/// deterministic and so the GNF pipeline can order variables with the
/// start symbol first and the rest in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: IndexMap<NonTerminal, Vec<ProductionBody>>,
    start: NonTerminal,
}

impl Grammar {
    /// Constructs an empty grammar with the given start symbol. The start
    /// symbol need not yet have any rules; a grammar with no rules at all
    /// generates the empty language.
    pub fn new(start: impl Into<NonTerminal>) -> Self {
        Self {
            rules: IndexMap::new(),
            start: start.into(),
        }
    }

    /// The start symbol.
    pub fn start(&self) -> &NonTerminal {
        &self.start
    }

    /// Changes the start symbol without touching any rules.
    pub fn set_start(&mut self, start: impl Into<NonTerminal>) {
        self.start = start.into();
    }

    /// Appends one production body to `lhs`'s rule list. Repeated calls
    /// for the same `lhs` accumulate, matching how the surface format
    /// merges repeated left-hand-side occurrences.
    pub fn add_body(&mut self, lhs: impl Into<NonTerminal>, body: ProductionBody) {
        self.rules.entry(lhs.into()).or_default().push(body);
    }

    /// Overwrites `lhs`'s entire rule list, preserving its position in
    /// iteration order if it already existed.
    pub fn set_bodies(&mut self, lhs: impl Into<NonTerminal>, bodies: Vec<ProductionBody>) {
        self.rules.insert(lhs.into(), bodies);
    }

    /// The production bodies for `lhs`, if any.
    pub fn bodies_of(&self, lhs: &str) -> Option<&[ProductionBody]> {
        self.rules.get(lhs).map(Vec::as_slice)
    }

    /// True if `lhs` has at least one recorded rule.
    pub fn contains(&self, lhs: &str) -> bool {
        self.rules.contains_key(lhs)
    }

    /// Removes `lhs` and its rules entirely, returning the bodies it had.
    pub fn remove(&mut self, lhs: &str) -> Option<Vec<ProductionBody>> {
        self.rules.shift_remove(lhs)
    }

    /// Iterates over every left-hand side and its production bodies, in
    /// insertion order.
    pub fn rules(&self) -> impl Iterator<Item = (&NonTerminal, &Vec<ProductionBody>)> {
        self.rules.iter()
    }

    /// Iterates over every non-terminal that has at least one rule, in
    /// insertion order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.rules.keys()
    }

    /// Number of distinct left-hand sides with rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if the grammar has no rules at all (generates the empty
    /// language).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every non-terminal name that appears anywhere on the right-hand
    /// side of a rule.
    pub fn referenced_non_terminals(&self) -> HashSet<NonTerminal> {
        let mut set = HashSet::new();
        for bodies in self.rules.values() {
            for body in bodies {
                for symbol in body {
                    if let Symbol::NonTerminal(name) = symbol {
                        set.insert(name.clone());
                    }
                }
            }
        }
        set
    }

    /// Every non-terminal name the grammar mentions anywhere: as a
    /// left-hand side or inside a production body. Used to seed the
    /// fresh-name generator so new names never collide with existing
    /// ones.
    pub fn all_non_terminal_names(&self) -> HashSet<NonTerminal> {
        let mut set: HashSet<NonTerminal> = self.rules.keys().cloned().collect();
        set.extend(self.referenced_non_terminals());
        set
    }

    /// Removes exact-duplicate bodies within each non-terminal's rule
    /// list, keeping the first occurrence (DEDUP, spec §4.10).
    pub fn dedup(&mut self) {
        for bodies in self.rules.values_mut() {
            let mut seen = HashSet::new();
            bodies.retain(|body| seen.insert(body.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lhs_accumulates() {
        let mut g = Grammar::new("S");
        g.add_body("S", vec![Symbol::Terminal('a')]);
        g.add_body("S", vec![Symbol::Terminal('b')]);
        assert_eq!(g.bodies_of("S").unwrap().len(), 2);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut g = Grammar::new("S");
        g.add_body("S", vec![Symbol::Terminal('a')]);
        g.add_body("S", vec![Symbol::Terminal('b')]);
        g.add_body("S", vec![Symbol::Terminal('a')]);
        g.dedup();
        assert_eq!(
            g.bodies_of("S").unwrap(),
            &[vec![Symbol::Terminal('a')], vec![Symbol::Terminal('b')]]
        );
    }

    #[test]
    fn all_non_terminal_names_covers_both_sides() {
        let mut g = Grammar::new("S");
        g.add_body(
            "S",
            vec![Symbol::Terminal('a'), Symbol::NonTerminal("A0".into())],
        );
        let names = g.all_non_terminal_names();
        assert!(names.contains("S"));
        assert!(names.contains("A0"));
    }
}
