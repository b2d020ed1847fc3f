//! PageTest CLI - Database migrations and support tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pagetest-cli migrate
//!
//! # Print the persisted selection record for a shop
//! pagetest-cli selections show -d shop-a.myshopify.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `selections show` - Inspect a shop's selection record

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pagetest-cli")]
#[command(author, version, about = "PageTest CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect selection records
    Selections {
        #[command(subcommand)]
        action: SelectionsAction,
    },
}

#[derive(Subcommand)]
enum SelectionsAction {
    /// Print the selection record for a shop
    Show {
        /// Shop domain
        #[arg(short, long)]
        domain: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Selections { action } => match action {
            SelectionsAction::Show { domain } => {
                commands::selections::show(&domain).await?;
            }
        },
    }
    Ok(())
}
