//! `stats` command: stored counts for one blog.

use console::style;

use crate::config::Settings;
use crate::utils::format_count;

pub async fn cmd_stats(settings: &Settings, blog_id: &str) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let blog = match ctx.blogs().get(blog_id).await? {
        Some(blog) => blog,
        None => {
            println!("{} Unknown blog: {}", style("✗").red(), blog_id);
            return Ok(());
        }
    };

    let stats = ctx.blogs().stats(blog_id).await?;

    println!("\n{}", style(&blog.name).bold());
    if let Some(author) = &blog.author_name {
        println!("  author: {}", author);
    }
    println!("  url: {}", blog.url);
    println!("  status: {}", blog.status.as_str());
    println!("  posts stored: {}", format_count(stats.total_posts));
    println!("  posts crawled: {}", format_count(stats.posts_completed));
    println!("  comments: {}", format_count(stats.total_comments));

    Ok(())
}
