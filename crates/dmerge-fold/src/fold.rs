//! The name-keyed reduction.
//!
//! A [`Fold`] accumulates records; [`Fold::finish`] consumes it and yields a
//! [`Folded`] result, so nothing can be rendered while records are still
//! arriving. Records keep the order in which their name first appeared.
//!
//! Counts and range unions do not depend on the order records arrive in.
//! The legacy cross-unit mean does, and the fold does not try to hide that.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dmerge_record::{render_document, MergeContext, MergeError, ParticleRecord, RecordResult};
use serde::Serialize;
use tracing::{debug, warn};

/// A merge that failed and was skipped; the earlier value was kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedMerge {
    pub particle: String,
    /// The source the rejected record came from, when known.
    pub source: Option<PathBuf>,
    pub reason: String,
}

/// Bookkeeping for one fold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FoldReport {
    pub sources_read: usize,
    pub count_only_sources: Vec<PathBuf>,
    pub records_absorbed: usize,
    pub merges_applied: usize,
    pub skipped_merges: Vec<SkippedMerge>,
    pub particles: usize,
}

/// What happened to one absorbed record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Absorbed {
    /// First record under this name.
    Inserted,
    /// Merged into the record already held.
    Merged,
    /// The merge failed; the held record is unchanged.
    Skipped(MergeError),
}

/// An in-progress reduction.
#[derive(Debug)]
pub struct Fold<R: ParticleRecord> {
    ctx: MergeContext,
    records: Vec<R>,
    index: HashMap<String, usize>,
    current_source: Option<PathBuf>,
    report: FoldReport,
}

impl<R: ParticleRecord> Fold<R> {
    pub fn new(ctx: MergeContext) -> Self {
        Self {
            ctx,
            records: Vec::new(),
            index: HashMap::new(),
            current_source: None,
            report: FoldReport::default(),
        }
    }

    /// Fold one record in.
    pub fn absorb(&mut self, record: R) -> Absorbed {
        self.report.records_absorbed += 1;

        let Some(slot) = self.index.get(record.name()).copied() else {
            self.index.insert(record.name().to_string(), self.records.len());
            self.records.push(record);
            return Absorbed::Inserted;
        };

        match self.records[slot].merge(&record, &self.ctx) {
            Ok(merged) => {
                debug!(particle = record.name(), count = merged.count(), "merged record");
                self.records[slot] = merged;
                self.report.merges_applied += 1;
                Absorbed::Merged
            }
            Err(err) => {
                warn!(particle = record.name(), error = %err, "skipped merge; keeping existing record");
                self.report.skipped_merges.push(SkippedMerge {
                    particle: record.name().to_string(),
                    source: self.current_source.clone(),
                    reason: err.to_string(),
                });
                Absorbed::Skipped(err)
            }
        }
    }

    /// Fold every record parsed from one source.
    pub fn absorb_source<I>(&mut self, path: &Path, records: I)
    where
        I: IntoIterator<Item = R>,
    {
        self.current_source = Some(path.to_path_buf());
        self.report.sources_read += 1;
        for record in records {
            self.absorb(record);
        }
        self.current_source = None;
    }

    /// Note a source that was read but carried only aggregate counts.
    pub fn skip_count_only(&mut self, path: &Path) {
        warn!(path = %path.display(), "count-only source contributes no records");
        self.report.sources_read += 1;
        self.report.count_only_sources.push(path.to_path_buf());
    }

    /// Number of distinct particles so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Close the fold.
    pub fn finish(mut self) -> Folded<R> {
        self.report.particles = self.records.len();
        Folded {
            records: self.records,
            index: self.index,
            report: self.report,
        }
    }
}

/// A completed reduction, ready to render.
#[derive(Clone, Debug)]
pub struct Folded<R: ParticleRecord> {
    records: Vec<R>,
    index: HashMap<String, usize>,
    report: FoldReport,
}

impl<R: ParticleRecord> Folded<R> {
    /// Records in first-appearance order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn report(&self) -> &FoldReport {
        &self.report
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.index.get(name).map(|&slot| &self.records[slot])
    }

    /// The full output document.
    pub fn render(&self) -> RecordResult<String> {
        render_document(&self.records)
    }

    pub fn into_parts(self) -> (Vec<R>, FoldReport) {
        (self.records, self.report)
    }
}
