//! blogseek - resumable blog crawler and archive for Naver blogs.
//!
//! Crawls a blog in five fixed stages (blog info, post list, post content,
//! reactions, comments), persisting fine-grained progress after every unit
//! of work so an interrupted session can resume exactly where it stopped.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod models;
pub mod progress;
pub mod repository;
pub mod schema;
pub mod scrapers;
pub mod utils;
