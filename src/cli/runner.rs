//! CLI runner - executes commands

use crate::approval::ApprovalService;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Result, ResultExt};
use crate::fetch::{CustomFetch, HttpTransport, Transport};
use crate::http::HttpClient;
use crate::pagination::{PaginatedAccumulator, PaginatedTransactions, PaginationState};
use crate::types::Transaction;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Fetch up to `limit` pages (unbounded when `None`) into `accumulator`
///
/// Stops early once the last page is merged, or when the server answers
/// `null` and the state resets. Returns the number of fetches performed.
pub async fn fetch_pages<T, Tr>(
    accumulator: &PaginatedAccumulator<T, Tr>,
    limit: Option<usize>,
) -> Result<usize>
where
    T: DeserializeOwned + Clone,
    Tr: Transport,
{
    let mut fetched = 0;

    while limit.map_or(true, |limit| fetched < limit) && accumulator.has_more() {
        accumulator.fetch_all().await?;
        fetched += 1;

        if accumulator.with_data(Option::is_none) {
            warn!(
                "{} returned no page, stopping after {} fetches",
                accumulator.cache_key(),
                fetched
            );
            break;
        }
    }

    Ok(fetched)
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::List { pages, all } => {
                let limit = if *all { None } else { Some(*pages) };
                self.list(&config, limit).await
            }
            Commands::Approve {
                transaction_id,
                revoke,
            } => self.approve(&config, transaction_id, !revoke).await,
            Commands::Config => self.show_config(&config),
        }
    }

    /// Load the config file (if any) and apply CLI overrides
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Loading config '{}'", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
            config.validate()?;
        }

        Ok(config)
    }

    /// Build the shared fetcher
    fn build_fetcher(config: &AppConfig) -> Result<Arc<CustomFetch<HttpTransport>>> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(Arc::new(CustomFetch::new(HttpTransport::new(client))))
    }

    async fn list(&self, config: &AppConfig, limit: Option<usize>) -> Result<()> {
        let fetcher = Self::build_fetcher(config)?;
        let transactions: PaginatedTransactions<_> =
            PaginatedAccumulator::transactions(fetcher).with_policy(config.in_flight_policy);

        let start = Instant::now();
        let fetched = fetch_pages(&transactions, limit).await?;
        info!(
            "Fetched {} pages ({} transactions) in {:?}",
            fetched,
            transactions.len(),
            start.elapsed()
        );

        let state = transactions.data();
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
            OutputFormat::Pretty => print_transactions(&state),
        }

        Ok(())
    }

    async fn approve(&self, config: &AppConfig, transaction_id: &str, value: bool) -> Result<()> {
        let fetcher = Self::build_fetcher(config)?;
        let service = ApprovalService::new(fetcher);

        service
            .set_transaction_approval(transaction_id, value)
            .await
            .with_context(|| format!("Setting approval of '{transaction_id}'"))?;

        match self.cli.format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "transactionId": transaction_id, "approved": value })
            ),
            OutputFormat::Pretty => {
                let verb = if value { "Approved" } else { "Revoked approval of" };
                println!("{verb} {transaction_id}");
            }
        }

        Ok(())
    }

    fn show_config(&self, config: &AppConfig) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
            OutputFormat::Pretty => print!("{}", serde_yaml::to_string(config)?),
        }
        Ok(())
    }
}

fn print_transactions(state: &PaginationState<Transaction>) {
    let Some(page) = state else {
        println!("No transactions");
        return;
    };

    for txn in &page.data {
        println!(
            "{:<12} {:<10} {:<28} {:<20} {:>10.2} {}",
            txn.id,
            txn.date,
            txn.merchant,
            txn.employee.full_name(),
            txn.amount,
            if txn.approved { "approved" } else { "pending" }
        );
    }

    match page.next_page {
        Some(next) => println!("{} transactions, next page {next}", page.data.len()),
        None => println!("{} transactions, no more pages", page.data.len()),
    }
}
