use thiserror::Error;

/// Errors raised by the validator before or outside of any format check.
///
/// Structural problems found inside a datastream are never reported through
/// this type; they become Fail findings in a [`crate::ValidationReport`].
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Invalid hex input: {input:?} contains a non-hexadecimal character")]
    InvalidHexInput { input: String },

    #[error("Invalid field width: expected 4 or 8 hex characters, got {width}")]
    InvalidFieldWidth { width: usize },

    #[error("Detector {detector} requires {required} parameters, {supplied} supplied")]
    MissingParameters {
        detector: &'static str,
        required: usize,
        supplied: usize,
    },

    #[error("Invalid value {value:?} for parameter {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
