//! `init` command.

use console::style;

use crate::config::Settings;

pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    println!(
        "{} Initialized data directory: {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  database: {}", settings.database_path().display());
    println!("  progress: {}", settings.progress_path().display());

    Ok(())
}
