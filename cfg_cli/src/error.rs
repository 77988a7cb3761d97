//! CLI-level errors: wraps I/O failures and grammar-file parse failures
//! behind one type, the same shape as `part2::scanner::error::Error`.

use std::fmt;
use std::io;

/// Something that stopped a subcommand from finishing.
#[derive(Debug)]
pub enum CliError {
    /// Reading the grammar file failed.
    Io(io::Error),
    /// The file was read but contained no usable rule.
    Parse(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Parse(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
