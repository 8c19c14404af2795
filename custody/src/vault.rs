//! Custody vault — deposits, withdrawals, emergency drain, external calls
//!
//! The vault holds a reserve of deposited value and releases it through
//! the external-call executor. Checks-Effects-Interactions ordering: every
//! entry point finishes its own bookkeeping before handing control to a
//! target, and the reentrancy guard rejects calls back in during that
//! window. A release the target rejects aborts the invocation and restores
//! the bookkeeping, so no partial mutation survives a failure.
//!
//! Conservation invariant: the sum of all balances equals the reserve in
//! every reachable state.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use types::ids::PrincipalId;

use crate::errors::{LedgerError, VaultError};
use crate::events::{
    AuditEvent, AuditLog, AuditRecord, DepositReceived, EmergencyDrained, ExternalCallExecuted,
    PauseChanged, WithdrawalExecuted,
};
use crate::executor::{CallOutcome, CallTarget, ExternalCallExecutor};
use crate::ledger::BalanceLedger;
use crate::security::{AccessControl, PauseSwitch, ReentrancyGuard};

/// Reserve-conserving custody ledger.
#[derive(Debug)]
pub struct CustodyVault {
    /// Net deposits minus withdrawals; always equals the sum of balances
    reserve: Decimal,
    /// Account balances
    balances: BalanceLedger,
    /// Security: reentrancy guard
    reentrancy: ReentrancyGuard,
    /// Security: pause circuit breaker
    pause: PauseSwitch,
    /// Security: role-based access control
    access: AccessControl,
    /// Audit log (append-only)
    audit: AuditLog,
}

impl CustodyVault {
    /// Create a vault with a zero reserve and an initial administrator.
    ///
    /// # Panics
    /// Panics if the administrator is the nil principal.
    pub fn new(admin: PrincipalId) -> Self {
        assert!(!admin.is_nil(), "admin must not be the nil principal");
        Self {
            reserve: Decimal::ZERO,
            balances: BalanceLedger::new(),
            reentrancy: ReentrancyGuard::new(),
            pause: PauseSwitch::new(),
            access: AccessControl::new(admin),
            audit: AuditLog::new(),
        }
    }

    // ───────────────────────── Deposit / Withdraw ─────────────────────────

    /// Take `amount` into custody for the caller.
    pub fn deposit(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, VaultError> {
        self.guarded(|v| v.deposit_inner(caller, amount))
    }

    fn deposit_inner(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, VaultError> {
        self.check_active()?;
        if caller.is_nil() {
            return Err(VaultError::InvalidRecipient);
        }
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }
        let new_reserve = self
            .reserve
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.credit(caller, amount)?;
        self.reserve = new_reserve;

        debug!(account = %caller, %amount, "deposit received");
        Ok(self.audit.record(AuditEvent::DepositReceived(DepositReceived {
            account: caller,
            amount,
        })))
    }

    /// Release `amount` of the caller's balance through `recipient`.
    ///
    /// The debit and reserve decrement are committed before the hand-off;
    /// a rejected release restores both and fails `ReleaseFailed`.
    pub fn withdraw(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
        recipient: &mut dyn CallTarget,
    ) -> Result<AuditRecord, VaultError> {
        self.guarded(|v| v.withdraw_inner(caller, amount, recipient))
    }

    fn withdraw_inner(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
        recipient: &mut dyn CallTarget,
    ) -> Result<AuditRecord, VaultError> {
        self.check_active()?;
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }
        let balance = self.balances.balance_of(&caller);
        if balance < amount {
            return Err(VaultError::Ledger(LedgerError::InsufficientFunds {
                required: amount.to_string(),
                available: balance.to_string(),
            }));
        }

        // Effects: fully committed before the interaction
        let prior_reserve = self.reserve;
        let new_reserve = self
            .reserve
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.debit(&caller, amount)?;
        self.reserve = new_reserve;

        // Interaction: control passes to external code
        let outcome = ExternalCallExecutor::invoke(self, recipient, &[]);
        if !outcome.success {
            self.balances.credit(caller, amount)?;
            self.reserve = prior_reserve;
            return Err(VaultError::ReleaseFailed);
        }

        debug!(account = %caller, %amount, "withdrawal executed");
        Ok(self
            .audit
            .record(AuditEvent::WithdrawalExecuted(WithdrawalExecuted {
                account: caller,
                amount,
            })))
    }

    /// Drain the entire reserve to `recipient`. Admin-only; remains
    /// operable while paused.
    pub fn emergency_withdraw(
        &mut self,
        caller: PrincipalId,
        recipient: &mut dyn CallTarget,
    ) -> Result<AuditRecord, VaultError> {
        self.guarded(|v| v.emergency_withdraw_inner(caller, recipient))
    }

    fn emergency_withdraw_inner(
        &mut self,
        caller: PrincipalId,
        recipient: &mut dyn CallTarget,
    ) -> Result<AuditRecord, VaultError> {
        if !self.access.is_admin(&caller) {
            return Err(VaultError::Unauthorized);
        }
        if recipient.id().is_nil() {
            return Err(VaultError::InvalidRecipient);
        }

        let amount = self.reserve;
        let drained = std::mem::take(&mut self.balances);
        self.reserve = Decimal::ZERO;

        let outcome = ExternalCallExecutor::invoke(self, recipient, &[]);
        if !outcome.success {
            self.balances = drained;
            self.reserve = amount;
            return Err(VaultError::ReleaseFailed);
        }

        warn!(admin = %caller, recipient = %recipient.id(), %amount, "reserve drained");
        Ok(self.audit.record(AuditEvent::EmergencyDrained(EmergencyDrained {
            admin: caller,
            recipient: recipient.id(),
            amount,
        })))
    }

    // ───────────────────────── External Calls ─────────────────────────

    /// Forward an arbitrary invocation to `target`. Admin-only.
    ///
    /// The outcome is returned to the caller, who decides whether a failed
    /// invocation is fatal; it is never converted into an error here. An
    /// audit record of `(target, success)` is emitted unconditionally.
    pub fn execute_call(
        &mut self,
        caller: PrincipalId,
        target: &mut dyn CallTarget,
        payload: &[u8],
    ) -> Result<CallOutcome, VaultError> {
        self.guarded(|v| v.execute_call_inner(caller, target, payload))
    }

    fn execute_call_inner(
        &mut self,
        caller: PrincipalId,
        target: &mut dyn CallTarget,
        payload: &[u8],
    ) -> Result<CallOutcome, VaultError> {
        if !self.access.is_admin(&caller) {
            return Err(VaultError::Unauthorized);
        }
        let target_id = target.id();
        if target_id.is_nil() {
            return Err(VaultError::InvalidTarget);
        }

        let outcome = ExternalCallExecutor::invoke(self, target, payload);

        debug!(target = %target_id, success = outcome.success, "external call executed");
        self.audit
            .record(AuditEvent::ExternalCallExecuted(ExternalCallExecuted {
                target: target_id,
                success: outcome.success,
            }));
        Ok(outcome)
    }

    // ───────────────────────── Pause ─────────────────────────

    /// Halt deposits and withdrawals. Admin-only.
    pub fn pause(&mut self, caller: PrincipalId) -> Result<(), VaultError> {
        self.guarded(|v| v.set_paused(caller, true))
    }

    /// Resume normal operation. Admin-only.
    pub fn unpause(&mut self, caller: PrincipalId) -> Result<(), VaultError> {
        self.guarded(|v| v.set_paused(caller, false))
    }

    fn set_paused(&mut self, caller: PrincipalId, paused: bool) -> Result<(), VaultError> {
        if !self.access.is_admin(&caller) {
            return Err(VaultError::Unauthorized);
        }
        if paused {
            self.pause.pause();
        } else {
            self.pause.unpause();
        }
        warn!(admin = %caller, paused, "pause state changed");
        self.audit.record(AuditEvent::PauseChanged(PauseChanged {
            admin: caller,
            paused,
        }));
        Ok(())
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Balance of an account. Unaffected by pause state.
    pub fn balance_of(&self, account: &PrincipalId) -> Decimal {
        self.balances.balance_of(account)
    }

    /// Net custody reserve.
    pub fn reserve(&self) -> Decimal {
        self.reserve
    }

    /// Check if the vault is paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Check if a principal holds the `Admin` role.
    pub fn is_admin(&self, principal: &PrincipalId) -> bool {
        self.access.is_admin(principal)
    }

    /// All audit records emitted so far.
    pub fn audit(&self) -> &[AuditRecord] {
        self.audit.records()
    }

    /// Drain all audit records (consume and clear).
    pub fn drain_audit(&mut self) -> Vec<AuditRecord> {
        self.audit.drain()
    }

    /// Verify the conservation invariant: sum of balances equals the
    /// reserve.
    pub fn check_reserve_invariant(&self) -> bool {
        self.balances.total() == self.reserve
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        if !self.reentrancy.acquire() {
            return Err(VaultError::ReentrantCall);
        }
        let result = op(self);
        self.reentrancy.release();
        result
    }

    fn check_active(&self) -> Result<(), VaultError> {
        if self.pause.is_paused() {
            return Err(VaultError::Paused);
        }
        Ok(())
    }
}
