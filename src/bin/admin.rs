//! CLI administration tool for minilink.
//!
//! Provides maintenance commands against the PostgreSQL registry without
//! requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired short URLs
//! cargo run --bin admin -- sweep
//!
//! # View registry statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use minilink::domain::registry::Registry;
use minilink::infrastructure::persistence::PgRegistry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing minilink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete all expired short URLs
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show registry statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Sweep { yes } => sweep(&pool, yes).await?,
        Commands::Stats => stats(&pool).await?,
        Commands::Db { action } => match action {
            DbAction::Check => db_check(&pool).await?,
        },
    }

    Ok(())
}

/// Deletes expired records and reports what remains.
async fn sweep(pool: &PgPool, yes: bool) -> Result<()> {
    let registry = PgRegistry::new(Arc::new(pool.clone()));

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all expired short URLs?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let removed = registry
        .sweep_expired()
        .await
        .context("Sweep failed")?;
    let remaining = registry.count().await.context("Count failed")?;

    println!(
        "{} {} expired short URLs",
        "Cleaned up".green().bold(),
        removed
    );
    println!("Remaining records: {}", remaining);

    Ok(())
}

/// Prints record and click totals.
async fn stats(pool: &PgPool) -> Result<()> {
    let registry = PgRegistry::new(Arc::new(pool.clone()));

    let total = registry.count().await.context("Count failed")?;
    let active = registry.list_active().await.context("Listing failed")?;
    let clicks: i64 = active.iter().map(|r| r.click_count).sum();

    println!("{}", "Registry statistics".bold());
    println!("  Total records:  {}", total);
    println!("  Active records: {}", active.len());
    println!("  Expired:        {}", total - active.len() as i64);
    println!("  Clicks (active): {}", clicks);

    if let Some(top) = active.iter().max_by_key(|r| r.click_count) {
        println!(
            "  Most clicked:   {} -> {} ({} clicks)",
            top.code.cyan(),
            top.original_url,
            top.click_count
        );
    }

    Ok(())
}

/// Verifies connectivity with a trivial query.
async fn db_check(pool: &PgPool) -> Result<()> {
    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await
        .context("Query failed")?;

    println!("{} {}", "Connected:".green().bold(), version);

    Ok(())
}
