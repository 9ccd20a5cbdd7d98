//! Fold driver for decay-merge.
//!
//! Resolves input sources, reads them fully into memory, parses each into
//! particle records, and reduces everything into one name-keyed record set,
//! merging records that share a name.
//!
//! # Key Types
//!
//! - [`MergeConfig`] -- Run settings, loadable from a TOML file
//! - [`Fold`] / [`Folded`] -- The accumulating and finished states of a reduction
//! - [`FoldReport`] / [`SkippedMerge`] -- What happened during a fold
//! - [`run_merge`] / [`run_check`] -- End-to-end entry points used by the CLI

pub mod config;
pub mod driver;
pub mod error;
pub mod fold;
pub mod source;

pub use config::MergeConfig;
pub use driver::{run_check, run_merge, CheckReport, CheckedFile, MergeSummary};
pub use error::{FoldError, FoldResult};
pub use fold::{Absorbed, Fold, FoldReport, Folded, SkippedMerge};
pub use source::{infer_format, resolve_sources, SourceFile};
