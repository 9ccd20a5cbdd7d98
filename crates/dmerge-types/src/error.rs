use thiserror::Error;

/// Errors produced while reading energies and units from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("unknown energy unit: {0:?}")]
    UnknownUnit(String),

    #[error("invalid energy magnitude: {0:?}")]
    InvalidMagnitude(String),

    #[error("malformed energy range: {0:?}")]
    MalformedRange(String),
}

pub type UnitResult<T> = Result<T, UnitError>;
