//! Error types for parsing, rendering, and merging records.

use dmerge_types::UnitError;

/// Errors raised while parsing or rendering a record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A text line did not have the expected shape.
    #[error("malformed line: {0}")]
    Malformed(String),

    /// A parse error tagged with the 1-based line it came from.
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<RecordError>,
    },

    /// An energy or range failed to parse.
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),

    /// A TOML entry was not a table.
    #[error("entry {name:?} is not a table")]
    NotATable { name: String },

    /// A TOML entry lacked a key it requires.
    #[error("entry {name:?} is missing required key {field:?}")]
    MissingField { name: String, field: &'static str },

    /// TOML decoding failed.
    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encoding failed.
    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

/// Convenience alias for parse and render results.
pub type RecordResult<T> = Result<T, RecordError>;

/// Reasons two records could not be merged.
///
/// A merge failure is never fatal: the fold keeps the value it already
/// holds and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("cannot merge {left:?} with {right:?}: names differ")]
    NameMismatch { left: String, right: String },

    #[error("cannot merge {name:?}: only one side carries a mean energy")]
    MissingMeanEnergy { name: String },

    #[error("cannot merge {name:?}: count overflow")]
    CountOverflow { name: String },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
