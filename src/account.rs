use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::bank::{Bank, SharedBank};

/// Account handle shared between a [`Bank`] and its callers.
pub type SharedAccount = Rc<RefCell<Account>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Amount {amount} cannot be applied to balance {balance} without rounding")]
    PrecisionExceeded { balance: Decimal, amount: Decimal },
}

#[derive(Debug, Clone)]
pub struct Account {
    owner: String,
    balance: Decimal,
    // lookup only, the bank never owns the account's lifetime
    bank: Weak<RefCell<Bank>>,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner: owner.into(),
            balance,
            bank: Weak::new(),
        }
    }

    pub fn into_shared(self) -> SharedAccount {
        Rc::new(RefCell::new(self))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    /// Balance keeps the scale it was built with, so `1000.00 - 100`
    /// renders as `900.00`.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Bank this account was added to, if it is still alive.
    pub fn bank(&self) -> Option<SharedBank> {
        self.bank.upgrade()
    }

    pub fn set_bank(&mut self, bank: &SharedBank) {
        self.bank = Rc::downgrade(bank);
    }

    pub(crate) fn link_bank(&mut self, bank: Weak<RefCell<Bank>>) {
        self.bank = bank;
    }

    /// Subtracts `amount` from the balance.
    ///
    /// A debit equal to the balance is allowed and leaves it at zero. Anything
    /// larger fails without touching the balance.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.balance = self.debited(amount)?;
        debug!(owner = %self.owner, %amount, balance = %self.balance, "debited");
        Ok(())
    }

    /// Adds `amount` to the balance. Only fails when the exact sum does not
    /// fit a [`Decimal`], in which case the balance is left as it was.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.balance = self.credited(amount)?;
        debug!(owner = %self.owner, %amount, balance = %self.balance, "credited");
        Ok(())
    }

    /// Balance after debiting `amount`, without applying it.
    pub(crate) fn debited(&self, amount: Decimal) -> Result<Decimal, AccountError> {
        if amount > self.balance {
            warn!(owner = %self.owner, %amount, balance = %self.balance, "debit rejected");
            return Err(AccountError::InsufficientFunds);
        }
        self.exact(amount, self.balance.checked_sub(amount))
    }

    /// Balance after crediting `amount`, without applying it.
    pub(crate) fn credited(&self, amount: Decimal) -> Result<Decimal, AccountError> {
        self.exact(amount, self.balance.checked_add(amount))
    }

    // rust_decimal silently drops fractional digits once the mantissa is full,
    // which shows up as a result scale below the operands'
    fn exact(&self, amount: Decimal, result: Option<Decimal>) -> Result<Decimal, AccountError> {
        match result {
            Some(result) if result.scale() >= self.balance.scale().max(amount.scale()) => {
                Ok(result)
            }
            _ => {
                warn!(owner = %self.owner, %amount, balance = %self.balance, "precision exceeded");
                Err(AccountError::PrecisionExceeded {
                    balance: self.balance,
                    amount,
                })
            }
        }
    }
}

/// Accounts compare by owner and balance; the bank link is ignored.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.balance == other.balance
    }
}

impl Eq for Account {}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.owner, self.balance)
    }
}
