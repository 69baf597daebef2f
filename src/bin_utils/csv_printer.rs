use std::io::Write;

use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Account {
    pub owner: String,
    pub balance: Decimal,
    pub bank: Option<String>,
}

pub fn print_accounts<W>(
    output: &mut W,
    accounts: impl Iterator<Item = Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    // header written by hand so an empty bank still prints it
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(["owner", "balance", "bank"])?;
    for acc in accounts {
        if let Err(err) = writer.serialize(acc) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
