//! Bazaar CLI - operator tools over the REST backend.
//!
//! # Usage
//!
//! ```bash
//! # Show categories in display order
//! bazaar categories list
//!
//! # Move the category at position 3 to the top
//! bazaar categories reorder --from 3 --to 0
//!
//! # List pending orders placed on a given day
//! bazaar orders list --status pending --date 2024-05-01
//!
//! # Export matching orders as CSV
//! bazaar orders export --search rahim --output rahim.csv
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - REST backend base URL (required)
//! - `API_TOKEN` - Bearer token, if the backend wants one
//! - `API_TIMEOUT_SECS` - Per-request timeout (default 15)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bazaar_core::{OrderFilter, OrderStatus};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and reorder the category tree
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// List and export orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Print categories in display order
    List,
    /// Move one category and save the new order
    Reorder {
        /// Current zero-based position
        #[arg(long)]
        from: usize,

        /// Target zero-based position
        #[arg(long)]
        to: usize,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Print orders matching the filters
    List(FilterArgs),
    /// Write orders matching the filters as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (defaults to orders-<today>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Same filters as the order console.
#[derive(Args)]
struct FilterArgs {
    /// Substring of order id, customer name or email
    #[arg(short, long)]
    search: Option<String>,

    /// Order date (YYYY-MM-DD, UTC)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Order status (pending, processing, shipped, delivered, cancelled)
    #[arg(long)]
    status: Option<OrderStatus>,
}

impl FilterArgs {
    fn into_filter(self) -> OrderFilter {
        OrderFilter::new(self.search.as_deref(), self.date, self.status)
    }
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_cli=info,bazaar_admin=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let client = commands::client()?;
    match cli.command {
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::categories::list(&client).await?,
            CategoryAction::Reorder { from, to } => {
                commands::categories::reorder(&client, from, to).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List(filters) => {
                commands::orders::list(&client, &filters.into_filter()).await?;
            }
            OrderAction::Export { filters, output } => {
                commands::orders::export(&client, &filters.into_filter(), output).await?;
            }
        },
    }
    Ok(())
}
