//! Orchestrator error type.

use thiserror::Error;

/// Failures that abort one blog's processing. Fetch and parse failures
/// never reach this type; only storage problems do.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}
