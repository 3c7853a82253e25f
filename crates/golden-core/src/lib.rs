//! # golden-core
//!
//! Core types for golden file comparison.
//!
//! This crate contains the fundamental types with **no internal dependencies**
//! on other golden crates. It provides:
//!
//! - Golden keys and version splicing
//! - Path styles and golden path resolution
//! - Configuration loaded from YAML
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - the comparator and CLI crates depend
//! on this one, but this crate has no dependencies on other golden crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod key;
pub mod path;

// Re-export commonly used types
pub use config::{ComparatorSettings, FailureSettings, GoldenConfig};
pub use error::{Error, Result};
pub use key::{versioned_key, GoldenKey};
pub use path::{BaseDirectory, PathResolver, PathStyle};
