use rust_decimal::Decimal;

use crate::{
    account::{Account, SharedAccount},
    bank::{Bank, BankError, SharedBank},
    command::{BankCommand, OperationKind},
};

use super::{OperationProcessError, OperationProcessor};

/// Runs operations against a single bank kept in memory. Accounts are
/// addressed by owner, so owners must be unique here even though the model
/// itself allows duplicates.
pub struct InMemoryOperationProcessor {
    pub bank: SharedBank,
}

impl InMemoryOperationProcessor {
    pub fn new(bank_name: impl Into<String>) -> Self {
        Self {
            bank: Bank::new(bank_name),
        }
    }

    fn account(&self, owner: &str) -> Result<SharedAccount, BankError> {
        self.bank
            .borrow()
            .find_account(owner)
            .ok_or_else(|| BankError::UnknownAccount {
                owner: owner.to_string(),
            })
    }
}

impl OperationProcessor for InMemoryOperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        account: String,
        counterparty: Option<String>,
        amount: Option<Decimal>,
    ) -> Result<(), OperationProcessError> {
        match BankCommand::parse_command(kind, account, counterparty, amount)? {
            BankCommand::Open(command) => {
                if self.bank.borrow().find_account(&command.owner).is_some() {
                    return Err(OperationProcessError::DuplicateAccount {
                        owner: command.owner,
                    });
                }
                let acc = Account::new(command.owner, command.balance).into_shared();
                self.bank.borrow_mut().add_account(&acc);
            }
            BankCommand::Debit(command) => {
                let acc = self.account(&command.owner)?;
                acc.borrow_mut()
                    .debit(command.amount)
                    .map_err(BankError::from)?;
            }
            BankCommand::Credit(command) => {
                let acc = self.account(&command.owner)?;
                acc.borrow_mut()
                    .credit(command.amount)
                    .map_err(BankError::from)?;
            }
            BankCommand::Transfer(command) => {
                self.bank.borrow().transfer_between(
                    &command.origin,
                    &command.destination,
                    command.amount,
                )?;
            }
        };
        Ok(())
    }
}
