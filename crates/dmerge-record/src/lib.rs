//! Particle records for decay-merge.
//!
//! A particle record is one named entity's aggregated measurement data.
//! Records come in two shapes, one per input format, and both implement
//! [`ParticleRecord`] so the fold driver can treat them uniformly.
//!
//! # Key Types
//!
//! - [`ParticleRecord`] -- Parse, render, and merge contract shared by both formats
//! - [`TextRecord`] / [`TextDetail`] / [`DecayRange`] -- Tab-delimited line format
//! - [`TomlRecord`] -- One TOML table per particle
//! - [`MergeContext`] -- Knobs that affect how two records combine

pub mod error;
pub mod merge;
pub mod record;
pub mod text;
pub mod toml_record;

pub use error::{MergeError, MergeResult, RecordError, RecordResult};
pub use merge::{sum_counts, MergeContext};
pub use record::{render_document, ParseOptions, ParticleRecord, SourceFormat};
pub use text::{DecayRange, TextDetail, TextRecord};
pub use toml_record::TomlRecord;
