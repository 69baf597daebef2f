//! Bootstraps [`crate::processor`] over CSV input and output. Kept in the
//! library so the integration tests can drive it.

use std::io::{Read, Write};

use crate::processor::{
    OperationProcessError, OperationProcessor, in_memory_processor::InMemoryOperationProcessor,
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use csv_printer::{Account, print_accounts};
use tracing::info;
pub mod csv_parser;
pub mod csv_printer;

/// Either a row that could not be read or an operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("Malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    Operation(#[from] OperationProcessError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub bank_name: String,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut processor = InMemoryOperationProcessor::new(self.bank_name);

        let mut processed = 0usize;
        for (line, row) in parser {
            let result = row.map_err(RowError::from).and_then(|op| {
                processor
                    .process_operation(op.kind, op.account, op.counterparty, op.amount)
                    .map_err(RowError::from)
            });
            match result {
                Ok(()) => processed += 1,
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let bank = processor.bank.borrow();
        info!(bank = %bank.name(), processed, accounts = bank.accounts().len(), "operations processed");

        print_accounts(
            self.output,
            bank.accounts().iter().map(|acc| {
                let acc = acc.borrow();
                Account {
                    owner: acc.owner().to_string(),
                    balance: acc.balance(),
                    bank: acc.bank().map(|bank| bank.borrow().name().to_string()),
                }
            }),
        )
    }
}
