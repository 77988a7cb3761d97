//! Context-free grammar normalization (Chomsky and Greibach normal form)
//! and bounded terminal-word enumeration.
//!
//! This crate has no file-system dependency: everything here operates on
//! in-memory `Grammar` values and plain strings. File I/O, argument
//! parsing, and process exit codes live in the `cfg_cli` binary crate.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod analysis;
pub mod cnf;
pub mod enumerate;
pub mod error;
pub mod fresh;
pub mod gnf;
pub mod grammar;
pub mod io;
pub mod rewrite;
pub mod symbol;

pub use error::Error;
pub use fresh::FreshNames;
pub use grammar::{Grammar, NonTerminal, ProductionBody};
pub use symbol::Symbol;
