//! Interactive entry point: prompts for a date range, then runs the full
//! scrape pipeline against the county portals.

use anyhow::{Context, Result};
use parcelmail_cli::orchestrator;
use parcelmail_core::{parse_input_date, AppConfig};
use std::io::{self, Write};
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "info,parcelmail_cli=debug,parcelmail_core=debug,parcelmail_browser=debug,\
             parcelmail_recorder=debug,parcelmail_auditor=debug,parcelmail_export=debug",
        )
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!("Starting parcelmail v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env().context("loading configuration")?;

    let start_raw = prompt("Enter the start date YYYYMMDD : \t")?;
    let end_raw = prompt("Enter the End date YYYYMMDD : \t")?;
    let start = parse_input_date(&start_raw).context("invalid start date")?;
    let end = parse_input_date(&end_raw).context("invalid end date")?;

    orchestrator::run(&config, start, end).await
}
