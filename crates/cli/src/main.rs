use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use stockboard_infra::{DashboardConfig, DashboardService, JsonSheetStore};
use stockboard_inventory::{CategorySelector, NewRecord};

#[derive(Parser, Debug)]
#[command(author, version, about = "stockboard: inventory dashboard over a sheet file", long_about = None)]
struct Cli {
    /// Inventory sheet path (overrides STOCKBOARD_DATA).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Low-stock threshold, inclusive (overrides STOCKBOARD_LOW_STOCK_THRESHOLD).
    #[arg(long, global = true)]
    threshold: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty sheet containing only the header row.
    Init,

    /// Print the dashboard views as JSON.
    Report {
        /// Category to show, or ALL.
        #[arg(long, default_value = CategorySelector::ALL)]
        category: CategorySelector,
    },

    /// Register a new inventory record.
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        stock: u32,
        /// Unit price; decimals such as 19.99 are kept exactly.
        #[arg(long)]
        price: Decimal,
        /// Received date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    stockboard_observability::init();

    let cli = Cli::parse();

    let config = DashboardConfig::from_env().with_overrides(cli.data, cli.threshold);
    tracing::debug!(path = %config.data_path.display(), threshold = config.low_stock_threshold, "config loaded");

    match cli.command {
        Commands::Init => {
            JsonSheetStore::create(&config.data_path)
                .with_context(|| format!("creating {}", config.data_path.display()))?;
        }
        Commands::Report { category } => {
            let service = DashboardService::new(JsonSheetStore::new(&config.data_path), config);
            tracing::debug!(path = %service.store().path().display(), selector = %category, "reading sheet");
            let summary = service
                .dashboard(&category)
                .context("building dashboard")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Add {
            product,
            category,
            stock,
            price,
            date,
        } => {
            let service = DashboardService::new(JsonSheetStore::new(&config.data_path), config);
            tracing::debug!(path = %service.store().path().display(), "appending to sheet");
            let record = service
                .register(NewRecord {
                    product_name: product,
                    category,
                    stock_quantity: stock,
                    unit_price: price,
                    received_date: date.unwrap_or_else(|| Local::now().date_naive()),
                })
                .context("registering record")?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
