//! Shared merge plumbing.
//!
//! Merging is pure: both operands are borrowed and a new record is returned.
//! Fields without merge semantics (stability, decay time, half-life) come
//! from the first operand.

use dmerge_types::MeanMode;

use crate::error::{MergeError, MergeResult};

/// Settings that influence how two records combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeContext {
    pub mean_mode: MeanMode,
}

impl MergeContext {
    pub fn new(mean_mode: MeanMode) -> Self {
        Self { mean_mode }
    }
}

/// Reject operands whose names differ.
pub(crate) fn ensure_same_name(left: &str, right: &str) -> MergeResult<()> {
    if left != right {
        return Err(MergeError::NameMismatch {
            left: left.to_string(),
            right: right.to_string(),
        });
    }
    Ok(())
}

/// Add two event counts, failing instead of wrapping.
pub fn sum_counts(name: &str, a: u64, b: u64) -> MergeResult<u64> {
    a.checked_add(b).ok_or_else(|| MergeError::CountOverflow {
        name: name.to_string(),
    })
}
