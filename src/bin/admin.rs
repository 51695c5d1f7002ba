//! CLI administration tool for short-url.
//!
//! Inspects and maintains stored links without going through HTTP. This is
//! the only place where links can be re-pointed or deleted.
//!
//! # Usage
//!
//! ```bash
//! # Show a link
//! cargo run --bin admin -- link show Ab3dE5gH
//!
//! # Point a code at a new URL
//! cargo run --bin admin -- link update Ab3dE5gH https://example.com/new
//!
//! # Delete a link
//! cargo run --bin admin -- link delete Ab3dE5gH
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection

use short_url::application::services::LinkService;
use short_url::config::{self, StorageBackend};
use short_url::infrastructure::persistence::PgLinkRepository;
use short_url::server::connect_pool;
use short_url::utils::code_generator::RandomCodeGenerator;
use short_url::AppError;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type AdminLinkService = LinkService<PgLinkRepository, RandomCodeGenerator>;

/// CLI tool for managing short-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or modify a link
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link maintenance subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show the URL a code points to
    Show { code: String },

    /// Point an existing code at a new URL
    Update {
        code: String,
        url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete a code
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool only works with the postgres storage backend");
    }

    let pool = connect_pool(&config).await?;
    let service = LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        Arc::new(RandomCodeGenerator),
    )
    .with_settings(config.link_service_settings());

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link maintenance commands.
async fn handle_link_action(action: LinkAction, service: &AdminLinkService) -> Result<()> {
    match action {
        LinkAction::Show { code } => show_link(service, &code).await,
        LinkAction::Update { code, url, yes } => update_link(service, &code, &url, yes).await,
        LinkAction::Delete { code, yes } => delete_link(service, &code, yes).await,
    }
}

async fn show_link(service: &AdminLinkService, code: &str) -> Result<()> {
    match service.resolve_short_link(code).await {
        Ok(link) => {
            println!("{}", "🔗 Short Link".bright_blue().bold());
            println!();
            println!("  Code:    {}", link.code.cyan());
            println!("  URL:     {}", link.long_url.bright_white());
            println!(
                "  Created: {}",
                link.created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            println!();
            Ok(())
        }
        Err(AppError::NotFound { .. }) => {
            println!("{}", format!("⚠️  No link with code '{}'", code).yellow());
            Ok(())
        }
        Err(e) => Err(describe(e)),
    }
}

/// Re-points a code after showing the current and new target.
async fn update_link(
    service: &AdminLinkService,
    code: &str,
    url: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "✏️  Update Short Link".bright_blue().bold());
    println!();

    let current = service.resolve_short_link(code).await.map_err(describe)?;

    println!("  Code: {}", current.code.cyan());
    println!("  From: {}", current.long_url.bright_black());
    println!("  To:   {}", url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Update this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let updated = service
        .update_short_link(code, url)
        .await
        .map_err(describe)?;

    println!();
    println!(
        "{} {}",
        "✅ Link now points to".green().bold(),
        updated.long_url.bright_white()
    );
    println!();

    Ok(())
}

/// Deletes a code with confirmation prompt (default: No).
async fn delete_link(service: &AdminLinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short Link".bright_blue().bold());
    println!();

    let current = service.resolve_short_link(code).await.map_err(describe)?;

    println!("  Code: {}", current.code.cyan());
    println!("  URL:  {}", current.long_url.bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    if service.delete_short_link(code).await.map_err(describe)? {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Displays the number of stored links.
async fn handle_stats(service: &AdminLinkService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count = service.count_links().await.map_err(describe)?;

    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .fetch_one(pool)
                .await
                .context("Database check failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn describe(e: AppError) -> anyhow::Error {
    let info = e.to_error_info();
    anyhow::anyhow!("{} ({})", info.message, info.code)
}
