//! Parsing and emitting the surface grammar text format (spec §6).
//!
//! This module only ever touches `&str`/`String`; opening and closing the
//! actual file handle is `cfg_cli`'s job, the same way
//! `file_buffer::FileBuffer` keeps the open `File` separate from the
//! scanning logic built on top of it.

use std::collections::HashSet;

use log::debug;

use crate::grammar::{Grammar, NonTerminal};
use crate::symbol::{tokenize, Symbol};

/// The rule separator this crate reads and writes. The source material
/// shows two dialects (`:` and `->`); this is the canonical one (spec §9
/// Open Question).
pub const SEPARATOR: &str = ":";

/// Parses the full text of a `.general` grammar file.
///
/// One rule per line: `<LHS> : <alt> ('|' <alt>)*`. Blank lines and lines
/// without the separator are ignored. Whitespace around tokens is
/// insignificant. Repeated left-hand sides accumulate their
/// alternatives in file order. The first left-hand side encountered
/// becomes the start symbol. Returns `None` if the file contains no
/// usable rule at all.
pub fn parse(text: &str) -> Option<Grammar> {
    let mut grammar: Option<Grammar> = None;

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((lhs_raw, rhs_raw)) = line.split_once(SEPARATOR) else {
            debug!("line {}: no '{}' separator, skipping: {:?}", line_no + 1, SEPARATOR, raw_line);
            continue;
        };

        let lhs = lhs_raw.trim();
        if lhs.is_empty() {
            debug!("line {}: empty left-hand side, skipping", line_no + 1);
            continue;
        }

        let g = grammar.get_or_insert_with(|| Grammar::new(lhs));

        for alt in rhs_raw.split('|') {
            g.add_body(lhs, parse_alt(alt));
        }
    }

    grammar
}

/// Parses one `|`-separated alternative into a production body, treating
/// a whitespace-stripped `E` as epsilon.
fn parse_alt(alt: &str) -> Vec<Symbol> {
    let stripped: String = alt.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped == "E" {
        return Vec::new();
    }
    tokenize(&stripped)
}

/// Emits a grammar in the canonical surface syntax: the axiom's line
/// first, remaining non-terminals in insertion order, each left-hand
/// side appearing exactly once, epsilon rendered as `E`.
pub fn emit(g: &Grammar) -> String {
    let mut out = String::new();
    let mut seen: HashSet<&NonTerminal> = HashSet::new();

    let start = g.start();
    let order = std::iter::once(start).chain(g.non_terminals().filter(|n| *n != start));

    for lhs in order {
        if !seen.insert(lhs) {
            continue;
        }
        let Some(bodies) = g.bodies_of(lhs) else {
            continue;
        };
        let alts: Vec<String> = bodies.iter().map(|body| render_body(body)).collect();
        out.push_str(lhs);
        out.push_str(" : ");
        out.push_str(&alts.join(" | "));
        out.push('\n');
    }

    out
}

/// Renders a single production body, with the empty body as `E`.
fn render_body(body: &[Symbol]) -> String {
    if body.is_empty() {
        return "E".to_string();
    }
    body.iter().map(Symbol::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alternatives_and_epsilon() {
        let g = parse("S : aSb | E\n").unwrap();
        assert_eq!(g.start(), "S");
        assert_eq!(
            g.bodies_of("S").unwrap(),
            &[
                vec![Symbol::Terminal('a'), Symbol::NonTerminal("S".into()), Symbol::Terminal('b')],
                vec![],
            ]
        );
    }

    #[test]
    fn repeated_lhs_lines_accumulate() {
        let g = parse("S : a\nS : b\n").unwrap();
        assert_eq!(g.bodies_of("S").unwrap().len(), 2);
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let g = parse("\nS : a\nnotarule\n").unwrap();
        assert_eq!(g.bodies_of("S").unwrap().len(), 1);
    }

    #[test]
    fn first_lhs_is_the_start_symbol() {
        let g = parse("A : a\nS : A\n").unwrap();
        assert_eq!(g.start(), "A");
    }

    #[test]
    fn emit_puts_axiom_first_and_epsilon_as_e() {
        let mut g = Grammar::new("S0");
        g.add_body("S0", vec![Symbol::NonTerminal("S".into())]);
        g.add_body("S", vec![Symbol::Terminal('a')]);
        g.add_body("S", vec![]);
        let text = emit(&g);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("S0 : S"));
        assert_eq!(lines.next(), Some("S : a | E"));
    }

    #[test]
    fn no_rules_yields_none() {
        assert!(parse("\n\nnot a rule\n").is_none());
    }
}
