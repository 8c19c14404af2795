//! Balance bookkeeping
//!
//! Authoritative principal → amount map. All arithmetic is checked; the
//! ledger knows nothing about authorization, pausing, or reentrancy —
//! those are enforced by the surfaces built on top of it.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::PrincipalId;

use crate::errors::LedgerError;

/// Account balance store.
///
/// Invariant: no entry is ever negative. Accounts with no entry read as
/// zero; every mutation routes through `credit`/`debit`/`transfer` so the
/// checks live at a single choke point.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    balances: HashMap<PrincipalId, Decimal>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance for an account; zero if the account has no entry.
    pub fn balance_of(&self, account: &PrincipalId) -> Decimal {
        self.balances.get(account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Increase an account's balance with overflow protection.
    pub fn credit(&mut self, account: PrincipalId, amount: Decimal) -> Result<(), LedgerError> {
        let current = self.balances.entry(account).or_insert(Decimal::ZERO);
        let new_balance = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        *current = new_balance;
        Ok(())
    }

    /// Decrease an account's balance.
    ///
    /// Fails with `InsufficientFunds` if the balance is smaller than
    /// `amount`, leaving the entry unchanged.
    pub fn debit(&mut self, account: &PrincipalId, amount: Decimal) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        if current < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount.to_string(),
                available: current.to_string(),
            });
        }
        let new_balance = current.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(*account, new_balance);
        Ok(())
    }

    /// Move `amount` from one account to another as one indivisible step.
    ///
    /// Both legs are validated before either balance is written, so no
    /// caller can observe a debited-but-not-credited state. A transfer to
    /// the same account validates and then changes nothing.
    pub fn transfer(
        &mut self,
        from: &PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount.to_string(),
                available: from_balance.to_string(),
            });
        }
        if *from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(&to);
        let credited = to_balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(*from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Sum of all entries. Saturates at `Decimal::MAX`; used by the
    /// conservation invariant checks.
    pub fn total(&self) -> Decimal {
        self.balances
            .values()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(*b))
    }
}
