//! Error types for roster construction, configuration and answer verification.

use thiserror::Error;

/// Integrity failures found while building a roster.
///
/// These are data errors in the static configuration, never the result of
/// player input.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster has no participants")]
    Empty,

    #[error("threshold {threshold} is invalid for a roster of {participants}")]
    InvalidThreshold { threshold: usize, participants: usize },

    #[error("duplicate participant id: {0}")]
    DuplicateId(String),

    #[error("participants {first} and {second} share the same public position")]
    DuplicatePosition { first: String, second: String },

    #[error("participant {0} has public position 0")]
    ZeroPosition(String),

    #[error("participant {id} has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },

    #[error("roster csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Submission problems reported back to the caller before any scoring happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("select exactly {expected} participants (got {got})")]
    InvalidSelection { expected: usize, got: usize },

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("participant {0} selected more than once")]
    DuplicateSelection(String),

    #[error("missing coefficients for: {}", names.join(", "))]
    MissingCoefficient { ids: Vec<String>, names: Vec<String> },

    #[error("enter a number for the final signature")]
    MissingSignature,

    #[error("answer of kind {got} submitted for a {expected} challenge")]
    AnswerKindMismatch {
        expected: &'static str,
        got: &'static str,
    },
}

/// A string that is neither an integer nor a fraction `n/d` with `d != 0`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an integer or a fraction n/d")]
pub struct ParseFractionError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, positive number (got {value})")]
    InvalidTolerance { name: &'static str, value: f64 },
}
