//! Error types shared by the normalization pipelines.

use std::fmt;

/// Failures that can arise while normalizing a grammar. Enumeration
/// (`crate::enumerate`) never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The fresh-name generator ran out of the 250 `A0..Z9` candidates.
    /// Fatal for the current pipeline run.
    TooManyNonTerminals,
    /// A grammar could not be placed in Greibach normal form, either
    /// because a rule still fails the head-terminal shape after
    /// head-terminalization, or because head-terminalization did not
    /// converge within its iteration cap.
    GreibachNotAchievable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooManyNonTerminals => {
                write!(f, "fresh-name generator exhausted all 250 non-terminal names")
            }
            Error::GreibachNotAchievable(reason) => {
                write!(f, "Greibach normal form is not achievable: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
