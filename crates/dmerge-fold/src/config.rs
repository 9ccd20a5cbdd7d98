use std::path::{Path, PathBuf};

use dmerge_record::{MergeContext, ParseOptions, SourceFormat};
use dmerge_types::MeanMode;
use serde::{Deserialize, Serialize};

use crate::error::{FoldError, FoldResult};

/// Settings for one merge run.
///
/// Every field has a default, so a config file only names what it changes:
///
/// ```toml
/// output = "merged.txt"
/// mean_mode = "strict"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Where the merged record set is written.
    pub output: PathBuf,
    /// Input format; inferred from file extensions when unset.
    pub input_format: Option<SourceFormat>,
    /// Cross-unit mean computation.
    pub mean_mode: MeanMode,
    /// Leading lines of each text file that are skipped. Source files carry
    /// two; set 0 only to re-read merged output, which has no header.
    pub header_lines: usize,
    /// Files containing this string anywhere contribute no records.
    pub count_only_marker: String,
    /// Accepted for compatibility; stable particles are not filtered.
    pub ignore_stable: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("out.txt"),
            input_format: None,
            mean_mode: MeanMode::Legacy,
            header_lines: 2,
            count_only_marker: "PARTICLE COUNT".into(),
            ignore_stable: false,
        }
    }
}

impl MergeConfig {
    /// Load a config file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> FoldResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FoldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| FoldError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            header_lines: self.header_lines,
        }
    }

    pub fn merge_context(&self) -> MergeContext {
        MergeContext::new(self.mean_mode)
    }
}
