//! Observation events emitted by a crawl session.

use crate::models::BlogStatus;
use crate::progress::CrawlStep;

/// Status reporting from the crawl worker to whoever is watching.
///
/// Purely observational: dropping the receiver never affects the crawl.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    Log(String),
    BlogStarted {
        blog_id: String,
        blog_name: String,
    },
    StageStarted {
        blog_id: String,
        step: CrawlStep,
    },
    StageCompleted {
        blog_id: String,
        step: CrawlStep,
    },
    /// Per-post progress within an iterating stage.
    PostProgress {
        blog_id: String,
        step: CrawlStep,
        done: u64,
        total: u64,
    },
    BlogFinished {
        blog_id: String,
        status: BlogStatus,
    },
    Finished,
}
