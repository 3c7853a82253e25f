//! Comparator context handed to golden assertions.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use golden_core::{GoldenConfig, GoldenKey, Result};

use crate::comparator::{ComparisonOutcome, GoldenComparator};
use crate::local::LocalFileComparator;
use crate::trivial::TrivialComparator;

/// Active comparator plus the auto-update flag.
///
/// Passed explicitly to whatever runs golden assertions. The default holds
/// a [`TrivialComparator`] with auto-update off, so a context is never
/// without a comparator.
#[derive(Clone)]
pub struct GoldenContext {
    comparator: Arc<dyn GoldenComparator>,
    auto_update: bool,
}

impl GoldenContext {
    /// Create a context around `comparator`, with auto-update off.
    pub fn new(comparator: Arc<dyn GoldenComparator>) -> Self {
        Self {
            comparator,
            auto_update: false,
        }
    }

    /// Create a context owning `comparator`.
    pub fn from_comparator<C>(comparator: C) -> Self
    where
        C: GoldenComparator + 'static,
    {
        Self::new(Arc::new(comparator))
    }

    /// Create a local file context for the test at `test_file`, configured by `config`.
    pub fn from_config(test_file: &str, config: &GoldenConfig) -> Result<Self> {
        config.validate()?;

        let mut comparator = LocalFileComparator::with_path_style(test_file, config.path_style())?;
        if config.failures.enabled {
            comparator = comparator.with_failure_output(config.failures.dir_name.clone());
        }

        Ok(Self::from_comparator(comparator).with_auto_update(config.comparator.auto_update))
    }

    /// Set whether mismatches overwrite the golden.
    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    /// Installed comparator.
    pub fn comparator(&self) -> &Arc<dyn GoldenComparator> {
        &self.comparator
    }

    /// Whether auto-update mode is on.
    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Check `image` against the golden for `key` at `version`.
    ///
    /// In auto-update mode the golden is overwritten and `Updated` is
    /// returned instead of comparing.
    pub async fn match_golden(
        &self,
        image: &[u8],
        key: &GoldenKey,
        version: Option<u32>,
    ) -> Result<ComparisonOutcome> {
        let golden = self.comparator.test_uri(key, version);
        debug!(
            comparator = self.comparator.name(),
            golden = %golden,
            auto_update = self.auto_update,
            "Matching golden"
        );

        if self.auto_update {
            self.comparator.update(&golden, image).await?;
            return Ok(ComparisonOutcome::Updated);
        }

        self.comparator.compare(image, &golden).await
    }
}

impl Default for GoldenContext {
    fn default() -> Self {
        Self::from_comparator(TrivialComparator)
    }
}

impl fmt::Debug for GoldenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldenContext")
            .field("comparator", &self.comparator.name())
            .field("auto_update", &self.auto_update)
            .finish()
    }
}
