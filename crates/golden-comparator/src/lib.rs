//! # golden-comparator
//!
//! Golden file comparison for visual regression tests.
//!
//! This crate provides:
//! - The [`GoldenComparator`] interface (compare, update, versioned keys)
//! - [`TrivialComparator`], the fallback used before setup
//! - [`LocalFileComparator`], goldens stored next to the test
//! - [`GoldenContext`], the comparator and auto-update flag handed to assertions
//! - A process-wide [`registry`] holding the active context
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on golden-core for keys,
//! path resolution, configuration and errors.
//!
//! ## Example
//!
//! ```no_run
//! use golden_comparator::{GoldenContext, LocalFileComparator};
//! use golden_core::GoldenKey;
//!
//! # async fn run(png: Vec<u8>) -> golden_core::Result<()> {
//! let comparator = LocalFileComparator::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/render.rs"))?;
//! let context = GoldenContext::from_comparator(comparator);
//! let outcome = context.match_golden(&png, &GoldenKey::new("goldens/button.png"), None).await?;
//! assert!(outcome.passed(), "{}", outcome.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparator;
pub mod context;
pub mod diff;
pub mod local;
pub mod registry;
pub mod trivial;

// Re-export commonly used types
pub use comparator::{ComparisonOutcome, GoldenComparator};
pub use context::GoldenContext;
pub use diff::ByteDiff;
pub use local::LocalFileComparator;
pub use trivial::TrivialComparator;
