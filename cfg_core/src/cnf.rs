//! The Chomsky normal form pipeline: REDUCE -> START -> TERM -> BIN ->
//! DEL-epsilon -> UNIT -> DEDUP (spec §4.4-§4.10).
//!
//! CNF is always achievable on a well-formed input (spec §7); the only
//! failure mode is `Error::TooManyNonTerminals` from the shared
//! fresh-name generator, propagated from TERM or BIN.

use log::debug;

use crate::analysis;
use crate::error::Error;
use crate::fresh::FreshNames;
use crate::grammar::Grammar;
use crate::rewrite;
use crate::symbol::Symbol;

/// Runs the full CNF pipeline over `g`, drawing fresh names from `fresh`.
pub fn normalize(g: &Grammar, fresh: &mut FreshNames) -> Result<Grammar, Error> {
    let g = reduce(g);
    debug!("CNF: after REDUCE, {} non-terminal(s)", g.len());
    let g = start(g);
    debug!("CNF: after START, start is {}", g.start());
    let g = term(&g, fresh)?;
    debug!("CNF: after TERM, {} non-terminal(s)", g.len());
    let g = bin(&g, fresh)?;
    debug!("CNF: after BIN, {} non-terminal(s)", g.len());
    let g = rewrite::del_epsilon(&g);
    debug!("CNF: after DEL-epsilon, {} non-terminal(s)", g.len());
    let mut g = rewrite::unit(&g);
    debug!("CNF: after UNIT, {} non-terminal(s)", g.len());
    g.dedup();
    Ok(g)
}

/// REDUCE (spec §4.4): keeps only non-terminals that are both reachable
/// from the start symbol and productive, and drops any body that
/// mentions a non-terminal outside that set. If the start symbol itself
/// is not in that set the result is the empty grammar.
pub fn reduce(g: &Grammar) -> Grammar {
    let reach = analysis::reachable(g);
    let prod = analysis::productive(g);
    let useful: std::collections::HashSet<_> = reach.intersection(&prod).cloned().collect();

    let mut out = Grammar::new(g.start().clone());
    if !useful.contains(g.start()) {
        debug!(
            "REDUCE: start symbol {} is unreachable or unproductive; yielding the empty grammar",
            g.start()
        );
        return out;
    }

    for (lhs, bodies) in g.rules() {
        if !useful.contains(lhs) {
            continue;
        }
        for body in bodies {
            let keep = body.iter().all(|s| match s {
                Symbol::Terminal(_) => true,
                Symbol::NonTerminal(n) => useful.contains(n),
            });
            if keep {
                out.add_body(lhs.clone(), body.clone());
            }
        }
    }
    out
}

/// START (spec §4.5): introduces a new axiom `S0 -> old_start` if the
/// start symbol is not already `S0`.
pub fn start(mut g: Grammar) -> Grammar {
    if g.start() != "S0" {
        let old_start = g.start().clone();
        g.add_body("S0", vec![Symbol::NonTerminal(old_start)]);
        g.set_start("S0");
    }
    g
}

/// TERM (spec §4.6): in every body of length >= 2, replaces each
/// terminal with a fresh non-terminal that derives only that terminal.
/// The terminal-to-non-terminal mapping is memoized within this pass.
pub fn term(g: &Grammar, fresh: &mut FreshNames) -> Result<Grammar, Error> {
    let mut out = Grammar::new(g.start().clone());
    let mut terminal_vars: indexmap::IndexMap<char, String> = indexmap::IndexMap::new();

    for (lhs, bodies) in g.rules() {
        for body in bodies {
            if body.len() < 2 {
                out.add_body(lhs.clone(), body.clone());
                continue;
            }

            let mut new_body = Vec::with_capacity(body.len());
            for s in body {
                match s {
                    Symbol::Terminal(c) => {
                        let nt = match terminal_vars.get(c) {
                            Some(nt) => nt.clone(),
                            None => {
                                let nt = fresh.next()?;
                                terminal_vars.insert(*c, nt.clone());
                                nt
                            }
                        };
                        new_body.push(Symbol::NonTerminal(nt));
                    }
                    Symbol::NonTerminal(n) => new_body.push(Symbol::NonTerminal(n.clone())),
                }
            }
            out.add_body(lhs.clone(), new_body);
        }
    }

    for (c, nt) in terminal_vars {
        out.add_body(nt, vec![Symbol::Terminal(c)]);
    }
    Ok(out)
}

/// BIN (spec §4.7): repeatedly splits any body of length > 2, left-first,
/// into a chain of binary rules, so the recursive splitting of a freshly
/// introduced tail rule happens within the same pass.
pub fn bin(g: &Grammar, fresh: &mut FreshNames) -> Result<Grammar, Error> {
    let mut out = Grammar::new(g.start().clone());
    for (lhs, bodies) in g.rules() {
        for body in bodies {
            split_body(lhs.clone(), body.clone(), &mut out, fresh)?;
        }
    }
    Ok(out)
}

/// Splits one body into binary rules rooted at `lhs`, chaining fresh
/// non-terminals until every body has length <= 2.
fn split_body(
    lhs: String,
    mut body: Vec<Symbol>,
    out: &mut Grammar,
    fresh: &mut FreshNames,
) -> Result<(), Error> {
    let mut current_lhs = lhs;
    loop {
        if body.len() <= 2 {
            out.add_body(current_lhs, body);
            return Ok(());
        }
        let head = body[0].clone();
        let rest = body[1..].to_vec();
        let tail = fresh.next()?;
        out.add_body(current_lhs, vec![head, Symbol::NonTerminal(tail.clone())]);
        current_lhs = tail;
        body = rest;
    }
}
