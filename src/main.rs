use std::time::Duration;

use balances::{
    client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT, DEFAULT_URL_TEMPLATE},
    ledger::Ledger,
    report::{OutputFormat, Report},
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pull every transaction from the API, then print the total and running daily balances.
#[derive(Parser)]
#[clap(version)]
struct Cli {
    /// Page URL, `{page}` standing for the page number
    #[clap(long, default_value = DEFAULT_URL_TEMPLATE)]
    url: String,
    /// Request timeout in seconds
    #[clap(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
    /// Report format: text, csv or json
    #[clap(long, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the report can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("balances=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(ClientConfig {
        url_template: cli.url,
        timeout: Duration::from_secs(cli.timeout),
    })?;

    let mut ledger = Ledger::default();
    ledger.pull_all(&client)?;
    info!(
        transactions = ledger.transactions().len(),
        "computing balances"
    );

    Report::try_from(&ledger)?.serialize(cli.format, std::io::stdout())
}
