//! Teller service
//!
//! Implements the business operations (create, deposit, withdraw, transfer,
//! delete) over the local store. When a remote client is attached, every
//! mutation that succeeds locally is mirrored to the authority; a remote
//! failure is logged as a warning and never reverses the local effect
//! (local-first, remote-best-effort).

use tracing::{debug, warn};

use crate::error::{CardBankError, CardBankResult};
use crate::models::{Account, AccountId};
use crate::remote::RemoteClient;
use crate::storage::LocalStore;

/// Business operations over accounts
pub struct Teller<'a> {
    store: &'a mut LocalStore,
    /// `Some` only when the process runs in remote mode
    remote: Option<&'a dyn RemoteClient>,
}

impl<'a> Teller<'a> {
    /// Create a teller; pass a remote client only in remote mode
    pub fn new(store: &'a mut LocalStore, remote: Option<&'a dyn RemoteClient>) -> Self {
        Self { store, remote }
    }

    /// Create a new account with a zero balance
    pub fn create(&mut self, password: u64) -> CardBankResult<Account> {
        let account = Account::new(password)?;
        if self.store.exists(&account.id) {
            return Err(CardBankError::duplicate(account.id));
        }
        self.store.put(&account)?;

        self.mirror("create", |remote| remote.create_account(&account));
        Ok(account)
    }

    /// Deposit an amount into an account
    pub fn deposit(&mut self, id: &AccountId, password: u64, amount: u64) -> CardBankResult<Account> {
        validate_amount(amount)?;
        let mut account = self.authenticate(id, password)?;

        account.balance = account.balance.checked_add(amount).ok_or_else(|| {
            CardBankError::Validation("deposit would overflow the balance".into())
        })?;
        self.store.put(&account)?;

        self.mirror("deposit", |remote| remote.deposit(id, amount));
        Ok(account)
    }

    /// Withdraw an amount from an account
    pub fn withdraw(
        &mut self,
        id: &AccountId,
        password: u64,
        amount: u64,
    ) -> CardBankResult<Account> {
        validate_amount(amount)?;
        let mut account = self.authenticate(id, password)?;

        if account.balance < amount {
            return Err(CardBankError::InsufficientFunds {
                needed: amount,
                available: account.balance,
            });
        }
        account.balance -= amount;
        self.store.put(&account)?;

        self.mirror("withdraw", |remote| remote.withdraw(id, amount));
        Ok(account)
    }

    /// Transfer an amount between two accounts
    ///
    /// Debit and credit are two independent writes with no atomicity between
    /// them; if the credit write fails after the debit succeeded, the store is
    /// left with the source debited. This narrow window is accepted behavior,
    /// matching the system this store replaces.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        password: u64,
        to: &AccountId,
        amount: u64,
    ) -> CardBankResult<Account> {
        validate_amount(amount)?;
        if from == to {
            return Err(CardBankError::Validation(
                "cannot transfer to the same account".into(),
            ));
        }

        let mut source = self.authenticate(from, password)?;
        if source.balance < amount {
            return Err(CardBankError::InsufficientFunds {
                needed: amount,
                available: source.balance,
            });
        }
        let mut target = self.store.get(to)?;
        target.balance = target.balance.checked_add(amount).ok_or_else(|| {
            CardBankError::Validation("transfer would overflow the target balance".into())
        })?;

        source.balance -= amount;
        self.store.put(&source)?;
        self.store.put(&target)?;

        self.mirror("transfer", |remote| remote.transfer(from, to, amount));
        Ok(source)
    }

    /// Close an account
    ///
    /// Rejected while the balance is non-zero; the money has to go somewhere
    /// first. The rule lives here, not in the store: store-level delete is
    /// unconditional.
    pub fn delete(&mut self, id: &AccountId, password: u64) -> CardBankResult<()> {
        let account = self.authenticate(id, password)?;
        if account.balance != 0 {
            return Err(CardBankError::Validation(format!(
                "account balance must be zero before deletion (current: {})",
                account.balance
            )));
        }
        self.store.remove(id)?;

        self.mirror("delete", |remote| remote.delete_account(id));
        Ok(())
    }

    /// List all stored accounts, ordered by identifier
    pub fn list(&mut self) -> CardBankResult<Vec<Account>> {
        let mut ids = self.store.ids()?;
        ids.sort_by_key(|id| id.to_string());

        let mut accounts = Vec::with_capacity(ids.len());
        for id in ids {
            accounts.push(self.store.get(&id)?);
        }
        Ok(accounts)
    }

    fn authenticate(&mut self, id: &AccountId, password: u64) -> CardBankResult<Account> {
        let account = self.store.get(id)?;
        if !account.verify_password(password) {
            return Err(CardBankError::Auth);
        }
        Ok(account)
    }

    /// Mirror a locally committed mutation to the remote authority
    ///
    /// Failures are soft: logged, never propagated.
    fn mirror<F>(&self, operation: &str, call: F)
    where
        F: FnOnce(&dyn RemoteClient) -> CardBankResult<()>,
    {
        let Some(remote) = self.remote else {
            return;
        };
        match call(remote) {
            Ok(()) => debug!(operation, "mirrored to remote authority"),
            Err(e) => {
                warn!(operation, error = %e, "remote mirror failed; change kept locally");
            }
        }
    }
}

fn validate_amount(amount: u64) -> CardBankResult<()> {
    if amount == 0 {
        return Err(CardBankError::Validation("amount must be positive".into()));
    }
    Ok(())
}
