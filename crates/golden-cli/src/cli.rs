//! Command line interface: argument parsing and command execution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use golden_comparator::{ComparisonOutcome, GoldenComparator, GoldenContext, LocalFileComparator};
use golden_core::{GoldenConfig, GoldenKey};

/// Compare rendered images against golden files.
#[derive(Debug, Parser)]
#[command(name = "golden")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Golden addressed by a command.
#[derive(Debug, Args)]
pub struct Target {
    /// Test file the golden key is relative to (path or file:// URI)
    #[arg(long)]
    pub test_file: String,

    /// Golden key, relative to the test file's directory
    pub key: String,

    /// Version spliced into the key before its extension
    #[arg(long)]
    pub version: Option<u32>,
}

impl Target {
    fn key(&self) -> GoldenKey {
        GoldenKey::new(&self.key)
    }

    /// Test file location, with a relative path taken from the working directory.
    fn test_location(&self) -> anyhow::Result<String> {
        let path = Path::new(&self.test_file);
        if self.test_file.starts_with("file:") || path.is_absolute() {
            return Ok(self.test_file.clone());
        }
        let cwd = std::env::current_dir().context("reading the working directory")?;
        Ok(cwd.join(path).to_string_lossy().into_owned())
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare an image against its golden
    Compare {
        /// Encoded image to check
        image: PathBuf,

        #[command(flatten)]
        target: Target,

        /// Overwrite the golden instead of comparing
        #[arg(long)]
        update_goldens: bool,
    },
    /// Store an image as the new golden
    Update {
        /// Encoded image to store
        image: PathBuf,

        #[command(flatten)]
        target: Target,
    },
    /// Print the file a golden key resolves to
    Resolve {
        #[command(flatten)]
        target: Target,
    },
}

/// Result of a command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    /// Compare finished
    Compare {
        /// Versioned key that was checked
        key: GoldenKey,
        /// Comparison outcome
        outcome: ComparisonOutcome,
    },
    /// Golden written
    Update {
        /// Versioned key that was written
        key: GoldenKey,
        /// File that was written
        path: PathBuf,
    },
    /// Golden resolved
    Resolve {
        /// Versioned key
        key: GoldenKey,
        /// File the key resolves to
        path: PathBuf,
    },
}

impl Report {
    /// Whether the command succeeded from a test's point of view.
    pub fn passed(&self) -> bool {
        match self {
            Report::Compare { outcome, .. } => outcome.passed(),
            Report::Update { .. } | Report::Resolve { .. } => true,
        }
    }

    /// Render the report for the terminal.
    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        Ok(match self {
            Report::Compare { key, outcome } => format!("{key}: {}", outcome.summary()),
            Report::Update { key, path } => format!("Updated {key} at {}", path.display()),
            Report::Resolve { path, .. } => path.display().to_string(),
        })
    }
}

/// Load configuration from `path`, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GoldenConfig> {
    match path {
        Some(path) => GoldenConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(GoldenConfig::default()),
    }
}

fn local_comparator(target: &Target, config: &GoldenConfig) -> anyhow::Result<LocalFileComparator> {
    let test_file = target.test_location()?;
    LocalFileComparator::with_path_style(&test_file, config.path_style())
        .with_context(|| format!("resolving goldens for {test_file}"))
}

async fn read_image(image: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(image)
        .await
        .with_context(|| format!("reading image {}", image.display()))
}

/// Run the parsed command.
pub async fn run(cli: &Cli, config: &GoldenConfig) -> anyhow::Result<Report> {
    match &cli.command {
        Command::Compare {
            image,
            target,
            update_goldens,
        } => {
            let test_file = target.test_location()?;
            let context = GoldenContext::from_config(&test_file, config)
                .with_context(|| format!("resolving goldens for {test_file}"))?
                .with_auto_update(config.comparator.auto_update || *update_goldens);

            let bytes = read_image(image).await?;
            let key = target.key();
            let outcome = context
                .match_golden(&bytes, &key, target.version)
                .await
                .with_context(|| format!("checking golden {key}"))?;

            Ok(Report::Compare {
                key: context.comparator().test_uri(&key, target.version),
                outcome,
            })
        }
        Command::Update { image, target } => {
            let comparator = local_comparator(target, config)?;
            let bytes = read_image(image).await?;
            let key = comparator.test_uri(&target.key(), target.version);
            comparator
                .update(&key, &bytes)
                .await
                .with_context(|| format!("updating golden {key}"))?;

            let path = comparator.golden_path(&key)?;
            info!(golden = %key, path = %path.display(), "Golden stored");
            Ok(Report::Update { key, path })
        }
        Command::Resolve { target } => {
            let comparator = local_comparator(target, config)?;
            let key = comparator.test_uri(&target.key(), target.version);
            let path = comparator
                .golden_path(&key)
                .with_context(|| format!("resolving golden {key}"))?;
            Ok(Report::Resolve { key, path })
        }
    }
}
