use std::fs::File;

use anyhow::{Context, Result};
use banco::{
    account::AccountError,
    bank::BankError,
    bin_utils::{RowError, Service},
    processor::OperationProcessError,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a file name as the first argument")?;
    let bank_name = args.next().unwrap_or_else(|| "Banco".to_string());
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        bank_name,
        error_printer: Box::new(|line, err| match err {
            // running out of money is not a technical error
            RowError::Operation(OperationProcessError::BankErr(BankError::AccountErr(
                AccountError::InsufficientFunds,
            ))) => {
                warn!(line, "skipped: insufficient funds")
            }
            err => eprintln!("Error at line {line}: {err}"),
        }),
    };
    service.run()
}
