//! CLI argument definitions and command dispatch.

mod blog;
mod crawl;
mod init;
mod stats;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "blogseek")]
#[command(about = "Resumable blog crawler for Naver-style blogs")]
#[command(version)]
pub struct Cli {
    /// Data directory holding the database and progress file
    #[arg(long, global = true)]
    target: Option<PathBuf>,

    /// Config file path (default: ./blogseek.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Manage crawl targets
    Blog {
        #[command(subcommand)]
        command: BlogCommands,
    },

    /// Crawl blogs through the five stages
    Crawl {
        /// Blog ids to crawl (default: every pending or in-progress blog)
        blog_ids: Vec<String>,
        /// Resume interrupted blogs, skipping stages already completed
        #[arg(short, long)]
        resume: bool,
    },

    /// Show crawl progress for every tracked blog
    Status,

    /// Show stored counts for one blog
    Stats {
        /// Blog id
        blog_id: String,
    },
}

#[derive(Subcommand)]
enum BlogCommands {
    /// Register a blog by URL or bare id
    Add {
        /// Blog URL (any supported shape) or bare blog id
        url: String,
    },
    /// List registered blogs
    List,
    /// Delete a blog and everything stored for it
    Remove {
        /// Blog id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        confirm: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref(), cli.target.as_deref());

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Blog { command } => match command {
            BlogCommands::Add { url } => blog::cmd_blog_add(&settings, &url).await,
            BlogCommands::List => blog::cmd_blog_list(&settings).await,
            BlogCommands::Remove { id, confirm } => {
                blog::cmd_blog_remove(&settings, &id, confirm).await
            }
        },
        Commands::Crawl { blog_ids, resume } => {
            crawl::cmd_crawl(&settings, blog_ids, resume).await
        }
        Commands::Status => status::cmd_status(&settings).await,
        Commands::Stats { blog_id } => stats::cmd_stats(&settings, &blog_id).await,
    }
}
