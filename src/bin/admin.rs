//! CLI administration tool for urlshort.
//!
//! Translates between ids and short codes, prints link statistics and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Short code of a record id
//! cargo run --bin admin -- encode 125
//!
//! # Record id named by a short code
//! cargo run --bin admin -- decode range
//!
//! # Statistics of a link
//! cargo run --bin admin -- stats range
//!
//! # Check database connection and record counts
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! `DATABASE_URL`, or the `POSTGRES_*` variables understood by the server.
//! Only `stats` and `db` connect to the database.

use urlshort::config::Config;
use urlshort::domain::entities::histogram_start;
use urlshort::domain::repositories::{StatsRepository, UrlRepository};
use urlshort::infrastructure::persistence::{PgStatsRepository, PgUrlRepository};
use urlshort::utils::short_code;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing urlshort.
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
    /// Print the short code of a record id
    Encode {
        /// Record id (non-negative)
        #[arg(value_parser = clap::value_parser!(i64).range(0..))]
        id: i64,
    },

    /// Print the record id named by a short code
    Decode {
        /// Short code
        code: String,
    },

    /// Show statistics of a short link
    Stats {
        /// Short code
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and count records
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { id } => handle_encode(id),
        Commands::Decode { code } => handle_decode(&code)?,
        Commands::Stats { code } => {
            let pool = connect().await?;
            handle_stats(&code, pool).await?;
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn handle_encode(id: i64) {
    println!("{}", short_code::encode(id).bright_green().bold());
}

fn handle_decode(code: &str) -> Result<()> {
    let id = short_code::decode(code).with_context(|| format!("'{}' is not a short code", code))?;

    println!("{}", id.to_string().bright_green().bold());

    if short_code::encode(id) != code {
        println!(
            "{}",
            format!("⚠️  Canonical form is '{}'", short_code::encode(id)).yellow()
        );
    }

    Ok(())
}

/// Displays the statistics of one link.
///
/// Shows:
/// - Original URL and creation time
/// - Total number of hits
/// - Hits per day for the last seven days
async fn handle_stats(code: &str, pool: PgPool) -> Result<()> {
    let pool = Arc::new(pool);
    let url_repo = PgUrlRepository::new(pool.clone());
    let stats_repo = PgStatsRepository::new(pool);

    let url = url_repo
        .find_by_short(code)
        .await
        .context("Failed to look up link")?
        .with_context(|| format!("No link with code '{}'", code))?;

    let now = Local::now();
    let total = stats_repo.total_hits(code).await?;
    let histogram = stats_repo.last_7_days(code, now).await?;

    println!("{}", format!("📊 Statistics for {}", url.code()).bright_blue().bold());
    println!();
    println!("  Original: {}", url.original.cyan());
    println!(
        "  Created:  {}",
        url.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
    );
    println!("  Total:    {}", total.to_string().bright_green().bold());
    println!();

    if histogram.is_empty() {
        println!(
            "{}",
            format!("  No hits since {}", histogram_start(now)).bright_black()
        );
    } else {
        println!("  {:<12} {}", "Day".bold(), "Hits".bold());
        for day in histogram {
            println!("  {:<12} {}", day.date.to_string(), day.hits);
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!();

            let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;

            let hits_count: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(hits), 0)::BIGINT FROM url_stats")
                    .fetch_one(pool)
                    .await?;

            println!(
                "  Links: {}",
                urls_count.to_string().bright_green().bold()
            );
            println!(
                "  Hits:  {}",
                hits_count.to_string().bright_green().bold()
            );
            println!();
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
