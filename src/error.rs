//! Error types for grid and atlas construction

use thiserror::Error;

/// Errors reported by the geometry builder, atlas baker and font book
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// A size or count argument was out of range (zero, negative, not
    /// finite, or too large for an atlas)
    #[error("invalid argument: {what} = {value}")]
    InvalidArgument {
        /// Name of the offending parameter
        what: &'static str,
        /// Offending value, formatted for the message
        value: String,
    },
    /// Font bytes could not be parsed
    #[error("failed to load font \"{family}\": {reason}")]
    Font { family: String, reason: String },
}

impl GridError {
    pub(crate) fn invalid(what: &'static str, value: impl ToString) -> Self {
        GridError::InvalidArgument {
            what,
            value: value.to_string(),
        }
    }
}

pub type GridResult<T> = std::result::Result<T, GridError>;
