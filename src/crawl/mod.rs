//! Crawl orchestration: the session state machine and its events.

mod error;
mod event;
mod session;

pub use error::CrawlError;
pub use event::CrawlEvent;
pub use session::{BlogSelection, CrawlReport, CrawlSession};
