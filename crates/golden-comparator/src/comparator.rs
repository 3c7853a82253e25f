//! Comparator interface shared by every golden storage backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use golden_core::{versioned_key, GoldenKey, Result};

use crate::diff::ByteDiff;

/// Result of checking an image against its golden.
///
/// `Err` from a comparator means the check could not be performed; a
/// difference between the bytes is always reported as [`Mismatch`].
///
/// [`Mismatch`]: ComparisonOutcome::Mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// Candidate is byte-for-byte identical to the golden
    Match,
    /// Candidate differs from the golden
    Mismatch(ByteDiff),
    /// No comparator installed; nothing was compared
    Skipped,
    /// Auto-update mode wrote the candidate as the new golden
    Updated,
}

impl ComparisonOutcome {
    /// Whether the assertion backed by this outcome should pass.
    pub fn passed(&self) -> bool {
        !matches!(self, ComparisonOutcome::Mismatch(_))
    }

    /// Byte difference, if the outcome is a mismatch.
    pub fn diff(&self) -> Option<&ByteDiff> {
        match self {
            ComparisonOutcome::Mismatch(diff) => Some(diff),
            _ => None,
        }
    }

    /// Generate a human-readable summary.
    pub fn summary(&self) -> String {
        match self {
            ComparisonOutcome::Match => "Golden matches".to_string(),
            ComparisonOutcome::Mismatch(diff) => diff.summary(),
            ComparisonOutcome::Skipped => "Golden comparison skipped".to_string(),
            ComparisonOutcome::Updated => "Golden updated".to_string(),
        }
    }
}

/// Compares encoded images against stored goldens.
///
/// This trait abstracts over golden storage, so assertions can run against
/// the local file system, a trivial fallback, or any other backend.
#[async_trait]
pub trait GoldenComparator: Send + Sync {
    /// Compare `image` against the golden named by `golden`.
    ///
    /// # Returns
    ///
    /// `Match` or `Mismatch` when the golden could be read, an error when it
    /// could not (missing file, I/O failure).
    async fn compare(&self, image: &[u8], golden: &GoldenKey) -> Result<ComparisonOutcome>;

    /// Store `image` as the new golden for `golden`.
    ///
    /// Writing the same bytes twice leaves the store unchanged.
    async fn update(&self, golden: &GoldenKey, image: &[u8]) -> Result<()>;

    /// Key to use for `key` at `version`.
    ///
    /// Defaults to [`versioned_key`].
    fn test_uri(&self, key: &GoldenKey, version: Option<u32>) -> GoldenKey {
        versioned_key(key, version)
    }

    /// Get the comparator name.
    ///
    /// Returns a human-readable name for logging.
    fn name(&self) -> &'static str;
}
