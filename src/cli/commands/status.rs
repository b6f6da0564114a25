//! `status` command: progress document overview.

use console::style;

use crate::config::Settings;
use crate::progress::{CrawlStep, ProgressStore, StepStatus};

pub async fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let store = ProgressStore::new(settings.progress_path());
    let state = store.load();

    if state.blogs.is_empty() {
        println!("{} No crawl progress recorded", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Crawl progress").bold());
    if let Some(updated) = state.last_updated {
        println!("  last updated: {}", updated.to_rfc3339());
    }

    for record in &state.blogs {
        let name = record.blog_name.as_deref().unwrap_or(&record.blog_id);
        println!(
            "\n  {} [{}] {}/{} posts",
            style(name).bold(),
            record.status.as_str(),
            record.current_post_index,
            record.total_posts
        );

        for step in CrawlStep::ALL {
            let glyph = match record.step_status(step) {
                StepStatus::Completed => style("✓").green(),
                StepStatus::InProgress => style("→").cyan(),
                StepStatus::Pending => style("·").dim(),
            };
            println!("    {} {}", glyph, step.label());
        }
    }

    if state.has_incomplete_work() {
        println!(
            "\n{} Incomplete work present; `blogseek crawl --resume` picks it up",
            style("!").yellow()
        );
    } else {
        println!("\n{} All tracked blogs are complete", style("✓").green());
    }

    Ok(())
}
