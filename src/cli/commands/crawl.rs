//! `crawl` command: runs a session with a live progress display.

use std::sync::atomic::Ordering;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::crawl::{BlogSelection, CrawlEvent, CrawlReport, CrawlSession};
use crate::progress::{CrawlStep, ProgressStore};
use crate::scrapers::{HttpClient, NaverBlogClient};

pub async fn cmd_crawl(
    settings: &Settings,
    blog_ids: Vec<String>,
    resume: bool,
) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let selection = if resume {
        if !blog_ids.is_empty() {
            println!(
                "{} --resume selects interrupted blogs itself; ignoring the given ids",
                style("!").yellow()
            );
        }
        BlogSelection::Resume
    } else if !blog_ids.is_empty() {
        BlogSelection::Explicit(blog_ids)
    } else {
        BlogSelection::Fresh
    };

    let store = ProgressStore::new(settings.progress_path());
    let site = NaverBlogClient::new(HttpClient::new(settings.pacing.clone()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = CrawlSession::new(ctx, store, site).with_events(tx);

    // Ctrl-C requests a graceful stop; the in-flight request completes and
    // progress is persisted before the session winds down
    let stop = session.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{} Stopping after the current item...", style("!").yellow());
            stop.store(true, Ordering::Relaxed);
        }
    });

    let worker = tokio::spawn(async move { session.run(selection).await });

    let mut bar: Option<(CrawlStep, ProgressBar)> = None;
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::Log(message) => print_line(&bar, &message),
            CrawlEvent::BlogStarted { blog_id, blog_name } => {
                print_line(
                    &bar,
                    &format!("{} {} ({})", style("→").cyan(), style(&blog_name).bold(), blog_id),
                );
            }
            CrawlEvent::StageStarted { step, .. } => {
                print_line(&bar, &format!("  stage: {}", step.label()));
            }
            CrawlEvent::StageCompleted { .. } => {
                if let Some((_, pb)) = bar.take() {
                    pb.finish_and_clear();
                }
            }
            CrawlEvent::PostProgress { step, done, total, .. } => {
                let pb = match &bar {
                    Some((current, pb)) if *current == step => pb.clone(),
                    _ => {
                        if let Some((_, old)) = bar.take() {
                            old.finish_and_clear();
                        }
                        let pb = ProgressBar::new(total);
                        pb.set_style(
                            ProgressStyle::default_bar()
                                .template(
                                    "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
                                )
                                .unwrap()
                                .progress_chars("█▓░"),
                        );
                        pb.set_message(step.label().to_string());
                        bar = Some((step, pb.clone()));
                        pb
                    }
                };
                pb.set_position(done);
            }
            CrawlEvent::BlogFinished { blog_id, status } => {
                if let Some((_, pb)) = bar.take() {
                    pb.finish_and_clear();
                }
                let glyph = match status {
                    crate::models::BlogStatus::Completed => style("✓").green(),
                    _ => style("!").yellow(),
                };
                println!("{} {} [{}]", glyph, blog_id, status.as_str());
            }
            CrawlEvent::Finished => break,
        }
    }
    if let Some((_, pb)) = bar.take() {
        pb.finish_and_clear();
    }

    let report = worker.await??;
    print_report(&report);
    Ok(())
}

fn print_line(bar: &Option<(CrawlStep, ProgressBar)>, message: &str) {
    match bar {
        Some((_, pb)) => pb.println(message),
        None => println!("{}", message),
    }
}

fn print_report(report: &CrawlReport) {
    println!(
        "\n{} completed: {}  interrupted: {}  failed: {}",
        style("Crawl finished.").bold(),
        style(report.completed).green(),
        style(report.interrupted).yellow(),
        style(report.failed).red()
    );
}
