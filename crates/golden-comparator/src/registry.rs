//! Process-wide golden context.
//!
//! For harnesses that cannot thread a [`GoldenContext`] through to their
//! assertions. Bootstrap installs a context once; readers always observe the
//! most recently installed one.

use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;
use tracing::debug;

use crate::context::GoldenContext;

lazy_static! {
    static ref ACTIVE: RwLock<GoldenContext> = RwLock::new(GoldenContext::default());
}

/// Install `context` as the process-wide context.
pub fn install(context: GoldenContext) {
    debug!(?context, "Installing golden context");
    *ACTIVE.write().unwrap_or_else(PoisonError::into_inner) = context;
}

/// Snapshot of the process-wide context.
pub fn current() -> GoldenContext {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Toggle auto-update mode on the process-wide context.
pub fn set_auto_update(auto_update: bool) {
    let mut active = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    *active = active.clone().with_auto_update(auto_update);
}

/// Restore the trivial default context.
pub fn reset() {
    install(GoldenContext::default());
}
