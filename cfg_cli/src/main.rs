//! cfg_cli - command-line front end for CFG normalization and bounded
//! word enumeration.
//!
//! Run `cargo doc --open` to view this documentation in a browser.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, error};

use cfg_core::{analysis, cnf, enumerate, gnf, io as grammar_io, FreshNames};

mod error;
use error::CliError;

/// Command-line arguments accepted by the grammar toolkit.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// The operations this tool offers.
#[derive(Subcommand)]
enum Command {
    /// Normalizes a grammar into Chomsky and Greibach normal form,
    /// writing `<input>.chomsky` and `<input>.greibach` alongside it.
    Grammar {
        /// Path to the `.general` grammar file.
        input: PathBuf,
        /// Echo intermediate grammar sizes while normalizing.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Enumerates every terminal word of length <= the given bound,
    /// sorted lexicographically, one per line.
    Generate {
        /// Maximum terminal-string length.
        bound: usize,
        /// Path to the `.general` grammar file.
        input: PathBuf,
    },
    /// Prints nullable/reachable/productive sets and FIRST/FOLLOW for
    /// every non-terminal. Diagnostic only; no pipeline stage depends on
    /// this output.
    Analysis {
        /// Path to the `.general` grammar file.
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match args.command {
        Command::Grammar { input, verbose } => run_grammar(&input, verbose),
        Command::Generate { bound, input } => run_generate(bound, &input),
        Command::Analysis { input } => run_analysis(&input),
    }
}

/// Runs the `grammar` subcommand: normalize to CNF and GNF, write both
/// sibling files. A Greibach failure on this input is diagnosed but does
/// not fail the process (spec §6).
fn run_grammar(input: &Path, verbose: bool) -> ExitCode {
    let grammar = match read_grammar(input) {
        Ok(g) => g,
        Err(code) => return code,
    };

    if verbose {
        println!("input non-terminals: {}", grammar.len());
    }

    let chomsky_path = input.with_extension("chomsky");
    let greibach_path = input.with_extension("greibach");

    let mut cnf_fresh = FreshNames::seeded(grammar.all_non_terminal_names());
    match cnf::normalize(&grammar, &mut cnf_fresh) {
        Ok(chomsky) => {
            if verbose {
                println!("chomsky non-terminals: {}", chomsky.len());
            }
            if let Err(e) = fs::write(&chomsky_path, grammar_io::emit(&chomsky)) {
                eprintln!(
                    "{} could not write {}: {}",
                    "[ERROR]".red(),
                    chomsky_path.display(),
                    e
                );
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            // CNF is always achievable on a well-formed grammar; reaching
            // here means the fresh-name generator was exhausted.
            error!("CNF normalization failed for {}: {e}", input.display());
            eprintln!("{} {}", "[ERROR]".red(), e);
            return ExitCode::FAILURE;
        }
    }

    // Independently seeded so CNF's and GNF's fresh names never collide.
    let mut gnf_fresh = FreshNames::seeded(grammar.all_non_terminal_names());
    match gnf::normalize(&grammar, &mut gnf_fresh) {
        Ok(greibach) => {
            if verbose {
                println!("greibach non-terminals: {}", greibach.len());
            }
            if let Err(e) = fs::write(&greibach_path, grammar_io::emit(&greibach)) {
                eprintln!(
                    "{} could not write {}: {}",
                    "[ERROR]".red(),
                    greibach_path.display(),
                    e
                );
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            debug!("GNF normalization failed for {}: {e}", input.display());
            eprintln!(
                "{} Greibach normal form not achievable for {}: {}",
                "[WARN]".yellow(),
                input.display(),
                e
            );
            if let Err(write_err) = fs::write(&greibach_path, "") {
                eprintln!(
                    "{} could not write {}: {}",
                    "[ERROR]".red(),
                    greibach_path.display(),
                    write_err
                );
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Runs the `generate` subcommand: enumerate and print the bounded word
/// set, one word per line, epsilon rendered as `ε`.
fn run_generate(bound: usize, input: &Path) -> ExitCode {
    let grammar = match read_grammar(input) {
        Ok(g) => g,
        Err(code) => return code,
    };

    for word in enumerate::enumerate(&grammar, bound) {
        if word.is_empty() {
            println!("\u{3b5}");
        } else {
            println!("{word}");
        }
    }

    ExitCode::SUCCESS
}

/// Runs the `analysis` subcommand: print nullable/reachable/productive
/// sets and FIRST/FOLLOW for every non-terminal, one line per set.
fn run_analysis(input: &Path) -> ExitCode {
    let grammar = match read_grammar(input) {
        Ok(g) => g,
        Err(code) => return code,
    };

    let null = analysis::nullable(&grammar);
    let reach = analysis::reachable(&grammar);
    let prod = analysis::productive(&grammar);
    let first = analysis::first_sets(&grammar);
    let follow = analysis::follow_sets(&grammar, &first);

    for name in grammar.non_terminals() {
        let first_str: String = first
            .get(name)
            .into_iter()
            .flatten()
            .map(|c| c.map(|c| c.to_string()).unwrap_or_else(|| "ε".to_string()))
            .collect::<Vec<_>>()
            .join(",");
        let follow_str: String = follow
            .get(name)
            .into_iter()
            .flatten()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{name}: nullable={} reachable={} productive={} FIRST={{{first_str}}} FOLLOW={{{follow_str}}}",
            null.contains(name),
            reach.contains(name),
            prod.contains(name),
        );
    }

    ExitCode::SUCCESS
}

/// Reads and parses a grammar file, printing a colored diagnostic and
/// returning the process's failure exit code on any I/O or parse error.
fn read_grammar(input: &Path) -> Result<cfg_core::Grammar, ExitCode> {
    read_grammar_inner(input).map_err(|e| {
        eprintln!("{} {}: {}", "[ERROR]".red(), input.display(), e);
        ExitCode::FAILURE
    })
}

/// The fallible core of [`read_grammar`], kept separate so its errors can
/// be converted to a single `CliError` before formatting.
fn read_grammar_inner(input: &Path) -> Result<cfg_core::Grammar, CliError> {
    let text = fs::read_to_string(input)?;
    grammar_io::parse(&text).ok_or_else(|| CliError::Parse("contains no usable rule".to_string()))
}
