//! MagrayArts CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! ma-cli migrate
//!
//! # Load the demo catalog (safe to run repeatedly)
//! ma-cli seed
//!
//! # Check the demo catalog without touching the database
//! ma-cli seed --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert the demo admin account, categories and products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use magray_arts_cli::commands;

#[derive(Parser)]
#[command(name = "ma-cli")]
#[command(author, version, about = "MagrayArts CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database with the demo catalog
    Seed {
        /// Validate the fixtures and exit without connecting
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { dry_run: true } => commands::seed::check()?,
        Commands::Seed { dry_run: false } => {
            let report = commands::seed::run().await?;
            tracing::info!(%report, "Database seeded");
        }
    }
    Ok(())
}
