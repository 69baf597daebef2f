use rust_decimal::{Decimal, prelude::Zero};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Open,
    Debit,
    Credit,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAccountCommand {
    pub owner: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFundsCommand {
    pub owner: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub origin: String,
    pub destination: String,
    pub amount: Decimal,
}

#[derive(Debug, Error)]
pub enum BankCommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Amount must not be negative for {kind:?}")]
    NegativeAmount { kind: OperationKind },
    #[error("Counterparty account is required for {kind:?}")]
    CounterpartyRequired { kind: OperationKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    Open(OpenAccountCommand),
    Debit(MoveFundsCommand),
    Credit(MoveFundsCommand),
    Transfer(TransferCommand),
}

impl BankCommand {
    pub fn parse_command(
        kind: OperationKind,
        account: String,
        counterparty: Option<String>,
        amount: Option<Decimal>,
    ) -> Result<Self, BankCommandError> {
        let amount = Self::parse_amount(kind, amount)?;
        match kind {
            OperationKind::Open => Ok(Self::Open(OpenAccountCommand {
                owner: account,
                balance: amount,
            })),
            OperationKind::Debit => Ok(Self::Debit(MoveFundsCommand {
                owner: account,
                amount,
            })),
            OperationKind::Credit => Ok(Self::Credit(MoveFundsCommand {
                owner: account,
                amount,
            })),
            OperationKind::Transfer => {
                let Some(destination) = counterparty.filter(|name| !name.is_empty()) else {
                    return Err(BankCommandError::CounterpartyRequired { kind });
                };
                Ok(Self::Transfer(TransferCommand {
                    origin: account,
                    destination,
                    amount,
                }))
            }
        }
    }

    fn parse_amount(
        kind: OperationKind,
        amount: Option<Decimal>,
    ) -> Result<Decimal, BankCommandError> {
        let Some(amount) = amount else {
            return Err(BankCommandError::AmountRequired { kind });
        };
        if amount >= Decimal::zero() {
            Ok(amount)
        } else {
            Err(BankCommandError::NegativeAmount { kind })
        }
    }
}
