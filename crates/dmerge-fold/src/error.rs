use std::path::PathBuf;

use dmerge_record::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FoldError {
    #[error("no input sources matched")]
    NoSources,

    #[error("sources mix text and TOML files: {text:?} and {toml:?}")]
    MixedFormats { text: PathBuf, toml: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    #[error("failed to render output: {0}")]
    Render(#[source] RecordError),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid source pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid configuration {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type FoldResult<T> = Result<T, FoldError>;
