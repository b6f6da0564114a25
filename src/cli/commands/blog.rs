//! `blog add` / `blog list` / `blog remove` commands.

use console::style;

use crate::config::Settings;
use crate::models::Blog;
use crate::progress::ProgressStore;
use crate::utils::{extract_blog_id, format_count};

/// Accept a full URL in any supported shape, or a bare blog id.
fn resolve_blog_id(input: &str) -> Option<String> {
    if let Some(id) = extract_blog_id(input) {
        return Some(id);
    }
    let bare = !input.contains('/')
        && !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    bare.then(|| input.to_string())
}

pub async fn cmd_blog_add(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let blog_id = match resolve_blog_id(url) {
        Some(id) => id,
        None => {
            println!("{} Not a recognizable blog URL or id: {}", style("✗").red(), url);
            return Ok(());
        }
    };

    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let blog = Blog::new(
        blog_id.clone(),
        blog_id.clone(),
        format!("https://blog.naver.com/{}", blog_id),
    );

    if ctx.blogs().add(&blog).await? {
        println!("{} Added blog: {}", style("✓").green(), blog_id);
    } else {
        println!("{} Blog already tracked: {}", style("!").yellow(), blog_id);
    }

    Ok(())
}

pub async fn cmd_blog_list(settings: &Settings) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let blogs = ctx.blogs().get_all().await?;
    if blogs.is_empty() {
        println!("{} No blogs registered", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Tracked blogs").bold());
    for blog in blogs {
        println!(
            "  {} {} [{}] {} posts",
            style("→").cyan(),
            style(&blog.id).bold(),
            blog.status.as_str(),
            format_count(blog.post_count)
        );
        if blog.name != blog.id {
            println!("      {}", blog.name);
        }
    }

    Ok(())
}

pub async fn cmd_blog_remove(settings: &Settings, id: &str, confirm: bool) -> anyhow::Result<()> {
    if !confirm {
        println!(
            "{} This deletes the blog and all its posts, reactions and comments.",
            style("!").yellow()
        );
        println!("  Re-run with --confirm to proceed.");
        return Ok(());
    }

    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;
    ctx.blogs().delete(id).await?;

    let store = ProgressStore::new(settings.progress_path());
    let mut state = store.load();
    state.remove(id);
    store.save(&mut state);

    println!("{} Removed blog: {}", style("✓").green(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_blog_id_accepts_bare_ids_and_urls() {
        assert_eq!(
            resolve_blog_id("https://blog.naver.com/gardenlog").as_deref(),
            Some("gardenlog")
        );
        assert_eq!(resolve_blog_id("gardenlog").as_deref(), Some("gardenlog"));
        assert_eq!(resolve_blog_id("not a blog id"), None);
        assert_eq!(resolve_blog_id("https://example.com/x"), None);
    }
}
