//! Errors handling

use std::fmt;

/// Represent a command-line usage error.
///
/// Raised while finalizing options, before anything is sent to the tracker.
#[derive(Debug, PartialEq, Eq)]
pub enum OptionsError {
    /// The repository is not of the form `owner/name`.
    InvalidRepository(String),
    EmptyLabel,
    /// The label contains a comma, which the issues listing reads as a
    /// separator between labels.
    LabelWithComma(String),
}

impl std::error::Error for OptionsError {}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionsError::InvalidRepository(repo) => {
                write!(f, "invalid repository {repo:?}, expected `owner/name`")
            }
            OptionsError::EmptyLabel => f.write_str("the label name cannot be empty"),
            OptionsError::LabelWithComma(label) => {
                write!(f, "invalid label {label:?}, label names cannot contain a comma")
            }
        }
    }
}
