use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::account::{Account, AccountError, SharedAccount};

pub type SharedBank = Rc<RefCell<Bank>>;

#[derive(Debug, Error)]
pub enum BankError {
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error("No account owned by `{owner}` in this bank")]
    UnknownAccount { owner: String },
    #[error("Cannot transfer from `{owner}` to the same account")]
    SameAccount { owner: String },
}

#[derive(Debug)]
pub struct Bank {
    name: String,
    accounts: Vec<SharedAccount>,
    this: Weak<RefCell<Bank>>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> SharedBank {
        let name = name.into();
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                name,
                accounts: Vec::new(),
                this: this.clone(),
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Accounts in the order they were added.
    pub fn accounts(&self) -> &[SharedAccount] {
        &self.accounts
    }

    /// Appends `account` and points its back-reference at this bank.
    ///
    /// Returns the bank so several additions can be chained.
    pub fn add_account(&mut self, account: &SharedAccount) -> &mut Self {
        account.borrow_mut().link_bank(self.this.clone());
        self.accounts.push(Rc::clone(account));
        self
    }

    /// First account added with the given owner.
    pub fn find_account(&self, owner: &str) -> Option<SharedAccount> {
        self.accounts
            .iter()
            .find(|acc| acc.borrow().owner() == owner)
            .cloned()
    }

    /// Debits `origin`, then credits `destination`.
    ///
    /// Neither account has to belong to this bank. Nothing is rolled back: both
    /// sides are checked first, so a failed transfer leaves both balances as
    /// they were. Insufficient funds on the origin is reported before any
    /// problem with the destination.
    pub fn transfer(
        &self,
        origin: &mut Account,
        destination: &mut Account,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        origin.debited(amount)?;
        destination.credited(amount)?;
        origin.debit(amount)?;
        destination.credit(amount)?;
        debug!(
            bank = %self.name,
            origin = %origin.owner(),
            destination = %destination.owner(),
            %amount,
            "transferred"
        );
        Ok(())
    }

    /// Transfers between two accounts of this bank, looked up by owner.
    pub fn transfer_between(
        &self,
        origin_owner: &str,
        destination_owner: &str,
        amount: Decimal,
    ) -> Result<(), BankError> {
        let origin = self.lookup(origin_owner)?;
        let destination = self.lookup(destination_owner)?;
        if Rc::ptr_eq(&origin, &destination) {
            return Err(BankError::SameAccount {
                owner: origin_owner.to_string(),
            });
        }
        self.transfer(
            &mut origin.borrow_mut(),
            &mut destination.borrow_mut(),
            amount,
        )?;
        Ok(())
    }

    fn lookup(&self, owner: &str) -> Result<SharedAccount, BankError> {
        self.find_account(owner)
            .ok_or_else(|| BankError::UnknownAccount {
                owner: owner.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    fn money(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn transfer() {
        let mut origin = Account::new("Alicia", money("2500"));
        let mut destination = Account::new("Rachul", money("1000"));

        let bank = Bank::new("Banco de la Nación");
        bank.borrow()
            .transfer(
                &mut origin,
                &mut destination,
                Decimal::from_u32(500).unwrap(),
            )
            .unwrap();

        assert_eq!(origin.balance().to_string(), "2000");
        assert_eq!(destination.balance().to_string(), "1500");
        // transfer alone does not register accounts
        assert!(bank.borrow().accounts().is_empty());
    }

    #[test]
    fn transfer_insufficient_funds() {
        let mut origin = Account::new("Alicia", money("400"));
        let mut destination = Account::new("Rachul", money("1000"));

        let bank = Bank::new("Banco de la Nación");
        let err = bank
            .borrow()
            .transfer(&mut origin, &mut destination, money("500"))
            .unwrap_err();

        assert!(matches!(err, AccountError::InsufficientFunds));
        assert_eq!(origin.balance(), money("400"));
        assert_eq!(destination.balance(), money("1000"));
    }

    #[test]
    fn transfer_to_full_destination() {
        let mut origin = Account::new("Alicia", money("2500"));
        let mut destination = Account::new("Rachul", Decimal::MAX);

        let bank = Bank::new("Banco de la Nación");
        let err = bank
            .borrow()
            .transfer(&mut origin, &mut destination, money("500"))
            .unwrap_err();

        assert!(matches!(err, AccountError::PrecisionExceeded { .. }));
        assert_eq!(origin.balance(), money("2500"));
        assert_eq!(destination.balance(), Decimal::MAX);

        // origin's shortfall wins over the destination's limit
        let err = bank
            .borrow()
            .transfer(&mut origin, &mut destination, money("3000"))
            .unwrap_err();
        assert_eq!(err, AccountError::InsufficientFunds);
    }

    #[test]
    fn bank_account_relations() {
        let origin = Account::new("Alicia", money("2500")).into_shared();
        let destination = Account::new("Rachul", money("1000")).into_shared();

        let bank = Bank::new("Banco del Estado");
        bank.borrow_mut().set_name("Banco de la Nación");
        bank.borrow_mut()
            .add_account(&origin)
            .add_account(&destination);
        bank.borrow()
            .transfer(
                &mut origin.borrow_mut(),
                &mut destination.borrow_mut(),
                money("500"),
            )
            .unwrap();

        assert_eq!(origin.borrow().balance().to_string(), "2000");
        assert_eq!(destination.borrow().balance().to_string(), "1500");
        assert_eq!(bank.borrow().accounts().len(), 2);

        let linked = origin.borrow().bank().unwrap();
        assert!(Rc::ptr_eq(&linked, &bank));
        assert_eq!(linked.borrow().name(), "Banco de la Nación");

        let found = bank.borrow().find_account("Alicia").unwrap();
        assert_eq!(found.borrow().owner(), "Alicia");
        assert!(Rc::ptr_eq(&found, &origin));
        assert!(
            bank.borrow()
                .accounts()
                .iter()
                .any(|acc| acc.borrow().owner() == "Alicia")
        );
        assert!(bank.borrow().find_account("Pepe").is_none());
    }

    #[test]
    fn accounts_keep_insertion_order() {
        let bank = Bank::new("Banco");
        for owner in ["Pepe", "María", "Carlos"] {
            let acc = Account::new(owner, money("1")).into_shared();
            bank.borrow_mut().add_account(&acc);
        }
        let owners: Vec<String> = bank
            .borrow()
            .accounts()
            .iter()
            .map(|acc| acc.borrow().owner().to_string())
            .collect();
        assert_eq!(owners, ["Pepe", "María", "Carlos"]);
    }

    #[test]
    fn transfer_between_owners() {
        let bank = Bank::new("Banco");
        let alicia = Account::new("Alicia", money("2500")).into_shared();
        let rachul = Account::new("Rachul", money("1000")).into_shared();
        bank.borrow_mut().add_account(&alicia).add_account(&rachul);

        bank.borrow()
            .transfer_between("Alicia", "Rachul", money("500"))
            .unwrap();
        assert_eq!(alicia.borrow().balance(), money("2000"));
        assert_eq!(rachul.borrow().balance(), money("1500"));

        let err = bank
            .borrow()
            .transfer_between("Alicia", "Rachul", money("2000.01"))
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::AccountErr(AccountError::InsufficientFunds)
        ));
        assert_eq!(err.to_string(), "Insufficient funds");
        assert_eq!(alicia.borrow().balance(), money("2000"));
        assert_eq!(rachul.borrow().balance(), money("1500"));

        let err = bank
            .borrow()
            .transfer_between("Alicia", "Pepe", money("1"))
            .unwrap_err();
        assert!(matches!(&err, BankError::UnknownAccount { owner } if owner == "Pepe"));

        let err = bank
            .borrow()
            .transfer_between("Alicia", "Alicia", money("1"))
            .unwrap_err();
        assert!(matches!(err, BankError::SameAccount { .. }));
        assert_eq!(alicia.borrow().balance(), money("2000"));
    }

    #[test]
    fn back_reference_does_not_keep_bank_alive() {
        let acc = Account::new("Alicia", money("1")).into_shared();
        {
            let bank = Bank::new("Banco");
            bank.borrow_mut().add_account(&acc);
            assert!(acc.borrow().bank().is_some());
        }
        assert!(acc.borrow().bank().is_none());
    }
}
