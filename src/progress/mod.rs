//! Durable crawl-progress document, independent of the entity store.
//!
//! Progress lives in a small JSON file that is read wholesale at startup and
//! rewritten wholesale after every state change. It is the sole source of
//! truth for resume decisions: a crash mid-stage leaves that stage's
//! `in_progress` marker behind, and the next run picks up from it rather
//! than restarting the blog from stage zero. Corruption is never fatal —
//! a malformed document is treated as "no prior progress".

mod state;
mod store;

pub use state::{BlogProgress, BlogProgressUpdate, CrawlStep, ProgressState, StepStatus};
pub use store::ProgressStore;
