//! End-to-end runs: resolve, read, parse, fold, render, write.

use std::path::{Path, PathBuf};

use dmerge_record::{ParseOptions, ParticleRecord, SourceFormat, TextRecord, TomlRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MergeConfig;
use crate::error::{FoldError, FoldResult};
use crate::fold::{Fold, FoldReport};
use crate::source::{infer_format, resolve_sources, SourceFile};

/// Outcome of a completed merge run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub format: SourceFormat,
    pub output: PathBuf,
    pub report: FoldReport,
}

/// Round-trip result for one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckedFile {
    pub path: PathBuf,
    pub count_only: bool,
    pub records: usize,
    /// Names of records that did not survive render-then-parse unchanged.
    pub mismatches: Vec<String>,
}

/// Round-trip results for every source of a check run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub format: SourceFormat,
    pub files: Vec<CheckedFile>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|f| f.mismatches.is_empty())
    }
}

/// Merge every source into `config.output`.
///
/// All sources are read before any parsing starts, and all are parsed before
/// the fold starts. A parse failure aborts the run; a failed merge does not.
pub fn run_merge(config: &MergeConfig, sources: &[String]) -> FoldResult<MergeSummary> {
    let (format, files) = load_sources(config, sources, Some(config.output.as_path()))?;
    if config.ignore_stable {
        info!("ignore_stable is set; stable particles are still written");
    }

    let report = match format {
        SourceFormat::Text => fold_and_write::<TextRecord>(config, &files)?,
        SourceFormat::Toml => fold_and_write::<TomlRecord>(config, &files)?,
    };

    info!(
        particles = report.particles,
        merges = report.merges_applied,
        skipped = report.skipped_merges.len(),
        output = %config.output.display(),
        "merge complete"
    );
    Ok(MergeSummary {
        format,
        output: config.output.clone(),
        report,
    })
}

/// Verify that every record in every source renders and re-parses unchanged.
pub fn run_check(config: &MergeConfig, sources: &[String]) -> FoldResult<CheckReport> {
    let (format, files) = load_sources(config, sources, None)?;
    let checked = match format {
        SourceFormat::Text => check_files::<TextRecord>(config, &files)?,
        SourceFormat::Toml => check_files::<TomlRecord>(config, &files)?,
    };
    Ok(CheckReport {
        format,
        files: checked,
    })
}

fn load_sources(
    config: &MergeConfig,
    sources: &[String],
    exclude: Option<&Path>,
) -> FoldResult<(SourceFormat, Vec<SourceFile>)> {
    let paths = resolve_sources(sources, exclude)?;
    let format = match config.input_format {
        Some(format) => format,
        None => infer_format(&paths)?,
    };
    debug!(sources = paths.len(), %format, "resolved sources");
    let files = paths
        .iter()
        .map(|p| SourceFile::read(p))
        .collect::<FoldResult<Vec<_>>>()?;
    Ok((format, files))
}

/// Per-source parse result; `None` marks a count-only source.
type Parsed<R> = (PathBuf, Option<Vec<R>>);

fn parse_files<R: ParticleRecord>(
    config: &MergeConfig,
    files: &[SourceFile],
) -> FoldResult<Vec<Parsed<R>>> {
    let options = config.parse_options();
    files
        .iter()
        .map(|file| -> FoldResult<Parsed<R>> {
            if file.is_count_only(&config.count_only_marker) {
                return Ok((file.path.clone(), None));
            }
            let records = R::parse_document(&file.content, &options).map_err(|source| {
                FoldError::Parse {
                    path: file.path.clone(),
                    source,
                }
            })?;
            Ok((file.path.clone(), Some(records)))
        })
        .collect()
}

fn fold_and_write<R: ParticleRecord>(
    config: &MergeConfig,
    files: &[SourceFile],
) -> FoldResult<FoldReport> {
    let parsed = parse_files::<R>(config, files)?;

    let mut fold = Fold::<R>::new(config.merge_context());
    for (path, records) in parsed {
        match records {
            Some(records) => fold.absorb_source(&path, records),
            None => fold.skip_count_only(&path),
        }
    }
    let folded = fold.finish();

    let rendered = folded.render().map_err(FoldError::Render)?;
    std::fs::write(&config.output, rendered).map_err(|source| FoldError::Write {
        path: config.output.clone(),
        source,
    })?;
    let (_, report) = folded.into_parts();
    Ok(report)
}

fn check_files<R: ParticleRecord>(
    config: &MergeConfig,
    files: &[SourceFile],
) -> FoldResult<Vec<CheckedFile>> {
    let parsed = parse_files::<R>(config, files)?;
    let fragment = ParseOptions { header_lines: 0 };

    let mut checked = Vec::with_capacity(parsed.len());
    for (path, records) in parsed {
        let Some(records) = records else {
            checked.push(CheckedFile {
                path,
                count_only: true,
                records: 0,
                mismatches: Vec::new(),
            });
            continue;
        };

        let mismatches: Vec<String> = records
            .iter()
            .filter(|record| {
                let reparsed = record
                    .render()
                    .and_then(|text| R::parse_document(&text, &fragment));
                !matches!(reparsed, Ok(ref again) if again.as_slice() == std::slice::from_ref(*record))
            })
            .map(|record| record.name().to_string())
            .collect();
        if !mismatches.is_empty() {
            warn!(path = %path.display(), count = mismatches.len(), "records failed round trip");
        }
        checked.push(CheckedFile {
            path,
            count_only: false,
            records: records.len(),
            mismatches,
        });
    }
    Ok(checked)
}
