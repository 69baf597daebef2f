use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    bank::BankError,
    command::{BankCommandError, OperationKind},
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum OperationProcessError {
    #[error(transparent)]
    CommandErr(#[from] BankCommandError),
    #[error(transparent)]
    BankErr(#[from] BankError),
    #[error("Account `{owner}` already exists")]
    DuplicateAccount { owner: String },
}

pub trait OperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        account: String,
        counterparty: Option<String>,
        amount: Option<Decimal>,
    ) -> Result<(), OperationProcessError>;
}
