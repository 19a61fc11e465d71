//! Lesson Shop CLI - Database migrations, seeding and catalog queries.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! lesson-cli migrate
//!
//! # Load lessons from a YAML file, replacing the existing catalog
//! lesson-cli seed --file crates/cli/seed/lessons.yaml --clear
//!
//! # List the catalog through the HTTP API, cheapest first
//! lesson-cli catalog list --sort price
//!
//! # Search the catalog
//! lesson-cli catalog search hendon
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert lessons from a YAML file
//! - `catalog` - Query a running storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use lesson_shop_client::SortKey;

mod commands;

#[derive(Parser)]
#[command(name = "lesson-cli")]
#[command(author, version, about = "Lesson shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Insert lessons from a YAML file
    Seed {
        /// Path to the YAML file
        #[arg(short, long)]
        file: String,

        /// Delete existing lessons first
        #[arg(long)]
        clear: bool,
    },
    /// Query a running storefront (uses `LESSON_SHOP_API_URL`)
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every lesson
    List {
        /// Sort by `subject`, `location`, `price` or `spaces`
        #[arg(short, long, default_value = "subject")]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Lessons whose subject or location contains the text
    Search {
        /// Text to search for
        text: String,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file, clear } => commands::seed::lessons(&file, clear).await?,
        Commands::Catalog { action } => match action {
            CatalogAction::List { sort, desc } => commands::catalog::list(sort, desc).await?,
            CatalogAction::Search { text } => commands::catalog::search(&text).await?,
        },
    }
    Ok(())
}
