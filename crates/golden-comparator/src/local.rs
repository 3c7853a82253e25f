//! Golden comparator backed by the local file system.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use golden_core::{BaseDirectory, Error, GoldenKey, PathResolver, PathStyle, Result};

use crate::comparator::{ComparisonOutcome, GoldenComparator};
use crate::diff::ByteDiff;

/// Comparator that stores goldens next to the test that owns them.
///
/// Keys are resolved against the directory containing the test file given
/// at construction. Comparison is exact: any difference in length or content
/// is a mismatch, including encoding differences that render identically.
#[derive(Debug, Clone)]
pub struct LocalFileComparator {
    base: BaseDirectory,
    resolver: PathResolver,
    failure_dir: Option<String>,
}

impl LocalFileComparator {
    /// Create a comparator for the test at `test_file` (path or `file://` URI).
    pub fn new(test_file: &str) -> Result<Self> {
        Self::with_path_style(test_file, PathStyle::platform())
    }

    /// Create a comparator that resolves paths with an explicit style.
    pub fn with_path_style(test_file: &str, style: PathStyle) -> Result<Self> {
        let resolver = PathResolver::new(style);
        let base = resolver.resolve_base(test_file)?;
        Ok(Self {
            base,
            resolver,
            failure_dir: None,
        })
    }

    /// Write failure artifacts into `dir_name` under the base directory on mismatch.
    pub fn with_failure_output(mut self, dir_name: impl Into<String>) -> Self {
        self.failure_dir = Some(dir_name.into());
        self
    }

    /// Directory goldens are resolved against.
    pub fn base_directory(&self) -> &BaseDirectory {
        &self.base
    }

    /// File system path of the golden named by `golden`.
    pub fn golden_path(&self, golden: &GoldenKey) -> Result<PathBuf> {
        self.resolver.to_file_path(&self.base, golden)
    }

    /// Path of a failure artifact for `golden`, e.g. `failures/foo_testImage.png`.
    fn failure_path(&self, dir_name: &str, golden: &GoldenKey, suffix: &str) -> Result<PathBuf> {
        let style = self.resolver.style();
        let file_name = self.resolver.file_name(&self.base, golden)?;
        let extension = GoldenKey::new(file_name.as_str()).extension().to_string();
        let stem = &file_name[..file_name.len() - extension.len()];

        let dir = style.join(self.base.as_str(), dir_name);
        let artifact = format!("{stem}_{suffix}{extension}");
        Ok(PathBuf::from(style.join(&dir, &artifact)))
    }

    async fn write_failure_artifacts(
        &self,
        dir_name: &str,
        golden: &GoldenKey,
        expected: &[u8],
        actual: &[u8],
    ) -> Result<()> {
        let master = self.failure_path(dir_name, golden, "masterImage")?;
        let test = self.failure_path(dir_name, golden, "testImage")?;
        write_bytes(&master, expected).await?;
        write_bytes(&test, actual).await?;
        info!(
            golden = %golden,
            master = %master.display(),
            test = %test.display(),
            "Wrote golden failure artifacts"
        );
        Ok(())
    }
}

/// Replace the contents of `path`, creating parent directories as needed.
async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl GoldenComparator for LocalFileComparator {
    async fn compare(&self, image: &[u8], golden: &GoldenKey) -> Result<ComparisonOutcome> {
        let path = self.golden_path(golden)?;
        debug!(golden = %golden, path = %path.display(), "Comparing against golden");

        let expected = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(golden = %golden, path = %path.display(), "Golden file does not exist");
                return Err(Error::MissingGolden {
                    key: golden.clone(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let Some(diff) = ByteDiff::between(&expected, image) else {
            return Ok(ComparisonOutcome::Match);
        };

        warn!(golden = %golden, "{}", diff.summary());
        // The mismatch is the result even when the artifacts cannot be kept.
        if let Some(dir_name) = &self.failure_dir {
            if let Err(e) = self
                .write_failure_artifacts(dir_name, golden, &expected, image)
                .await
            {
                warn!(golden = %golden, error = %e, "Failed to write golden failure artifacts");
            }
        }
        Ok(ComparisonOutcome::Mismatch(diff))
    }

    async fn update(&self, golden: &GoldenKey, image: &[u8]) -> Result<()> {
        let path = self.golden_path(golden)?;
        write_bytes(&path, image).await?;
        info!(golden = %golden, path = %path.display(), bytes = image.len(), "Updated golden file");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local-file"
    }
}
