//! The record contract shared by both input formats.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeResult, RecordResult};
use crate::merge::MergeContext;

/// The two input formats. A run never mixes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Tab-delimited lines after a two-line header.
    Text,
    /// One table per particle.
    Toml,
}

impl SourceFormat {
    /// The format a path's extension suggests: `.toml` is TOML, anything
    /// else is text.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Toml => f.write_str("toml"),
        }
    }
}

/// Options that affect document parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Leading lines of a text document that are skipped unconditionally.
    pub header_lines: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { header_lines: 2 }
    }
}

/// A particle record that can be parsed from a whole document, rendered back
/// to that document's convention, and merged with another record of the same
/// particle.
///
/// Implementations must satisfy:
/// - `parse_document(render(r)) == [r]` for every record the parser produces.
/// - `merge` is pure and fails rather than panicking on incompatible input.
/// - `merge(a, b).count() == merge(b, a).count() == a.count() + b.count()`.
pub trait ParticleRecord: Clone + fmt::Debug + PartialEq + Sized {
    /// The input format this record shape comes from.
    const FORMAT: SourceFormat;

    /// The particle name, the fold key.
    fn name(&self) -> &str;

    /// Number of observed or simulated events.
    fn count(&self) -> u64;

    /// Parse every record in a document, in document order.
    fn parse_document(content: &str, options: &ParseOptions) -> RecordResult<Vec<Self>>;

    /// Render this record as a standalone fragment of its format, including
    /// the trailing line terminator.
    fn render(&self) -> RecordResult<String>;

    /// Combine `self` (the value already held) with `other` (the newcomer).
    fn merge(&self, other: &Self, ctx: &MergeContext) -> MergeResult<Self>;
}

/// Concatenate the rendering of every record, in order.
pub fn render_document<R: ParticleRecord>(records: &[R]) -> RecordResult<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.render()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::for_path(&PathBuf::from("a/run1.toml")), SourceFormat::Toml);
        assert_eq!(SourceFormat::for_path(&PathBuf::from("a/run1.TOML")), SourceFormat::Toml);
        assert_eq!(SourceFormat::for_path(&PathBuf::from("a/run1.txt")), SourceFormat::Text);
        assert_eq!(SourceFormat::for_path(&PathBuf::from("a/run1")), SourceFormat::Text);
    }

    #[test]
    fn default_header_lines() {
        assert_eq!(ParseOptions::default().header_lines, 2);
    }

    #[test]
    fn format_display() {
        assert_eq!(SourceFormat::Text.to_string(), "text");
        assert_eq!(SourceFormat::Toml.to_string(), "toml");
    }
}
