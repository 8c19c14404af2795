//! Token ledger — supply, transfers, allowances, minting, batch transfers
//!
//! Every mutating entry point runs the same discipline: reentrancy guard,
//! pause check, authorization, input validation, ledger mutation, audit
//! append. Any failure aborts the invocation with no partial mutation.
//!
//! Conservation invariant: the sum of all balances equals the recorded
//! total supply in every reachable state.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};
use types::ids::PrincipalId;

use crate::batch::BatchTransferCoordinator;
use crate::config::EngineConfig;
use crate::errors::{LedgerError, TokenError};
use crate::events::{
    ApprovalSet, AuditEvent, AuditLog, AuditRecord, BatchTransferExecuted,
    DelegatedTransferExecuted, MintExecuted, PauseChanged, RoleGranted, RoleRevoked,
    TransferExecuted,
};
use crate::ledger::BalanceLedger;
use crate::security::{AccessControl, PauseSwitch, ReentrancyGuard, Role};

/// Supply-conserving ledger with delegated transfers and minting.
#[derive(Debug)]
pub struct TokenLedger {
    /// Recorded total supply; always equals the sum of balances
    total_supply: Decimal,
    /// Account balances
    balances: BalanceLedger,
    /// (owner, spender) → remaining delegated budget
    allowances: HashMap<(PrincipalId, PrincipalId), Decimal>,
    /// Security: reentrancy guard
    reentrancy: ReentrancyGuard,
    /// Security: pause circuit breaker
    pause: PauseSwitch,
    /// Security: role-based access control
    access: AccessControl,
    /// Batch validation
    batch: BatchTransferCoordinator,
    /// Audit log (append-only)
    audit: AuditLog,
}

impl TokenLedger {
    /// Create a token ledger with the default configuration.
    ///
    /// The creator receives the `Admin` and `Minter` roles and is credited
    /// the initial supply.
    pub fn new(creator: PrincipalId, initial_supply: Decimal) -> Self {
        Self::with_config(creator, initial_supply, EngineConfig::default())
    }

    /// Create a token ledger with an explicit configuration.
    ///
    /// # Panics
    /// Panics if the creator is the nil principal, the initial supply is
    /// negative, or the batch bound is zero.
    pub fn with_config(
        creator: PrincipalId,
        initial_supply: Decimal,
        config: EngineConfig,
    ) -> Self {
        assert!(!creator.is_nil(), "creator must not be the nil principal");
        assert!(
            initial_supply >= Decimal::ZERO,
            "initial supply must be non-negative"
        );

        let mut access = AccessControl::new(creator);
        access.grant(&creator, Role::Minter, creator);

        let mut balances = BalanceLedger::new();
        if initial_supply > Decimal::ZERO {
            balances
                .credit(creator, initial_supply)
                .expect("crediting an empty ledger cannot overflow");
        }

        Self {
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
            reentrancy: ReentrancyGuard::new(),
            pause: PauseSwitch::new(),
            access,
            batch: BatchTransferCoordinator::new(config.max_batch_size),
            audit: AuditLog::new(),
        }
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Transfer from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.guarded(|t| t.transfer_inner(caller, to, amount))
    }

    fn transfer_inner(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.check_active()?;
        if to.is_nil() {
            return Err(TokenError::InvalidRecipient);
        }
        if amount <= Decimal::ZERO {
            return Err(TokenError::InvalidAmount);
        }
        self.balances.transfer(&caller, to, amount)?;

        debug!(%caller, %to, %amount, "transfer executed");
        Ok(self.audit.record(AuditEvent::TransferExecuted(TransferExecuted {
            from: caller,
            to,
            amount,
        })))
    }

    /// Set the allowance `spender` may move out of the caller's balance.
    /// An amount of zero resets the delegate.
    pub fn approve(
        &mut self,
        caller: PrincipalId,
        spender: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.guarded(|t| t.approve_inner(caller, spender, amount))
    }

    fn approve_inner(
        &mut self,
        caller: PrincipalId,
        spender: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.check_active()?;
        if spender.is_nil() {
            return Err(TokenError::InvalidSpender);
        }
        if amount < Decimal::ZERO {
            return Err(TokenError::InvalidAmount);
        }
        self.allowances.insert((caller, spender), amount);

        Ok(self.audit.record(AuditEvent::ApprovalSet(ApprovalSet {
            owner: caller,
            spender,
            amount,
        })))
    }

    /// Transfer out of `owner`'s balance on the strength of an allowance
    /// granted to the caller. The allowance is consumed only when the
    /// underlying transfer succeeds, and the true outcome is always
    /// propagated to the caller.
    pub fn transfer_from(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.guarded(|t| t.transfer_from_inner(caller, owner, to, amount))
    }

    fn transfer_from_inner(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.check_active()?;
        if owner.is_nil() || to.is_nil() {
            return Err(TokenError::InvalidRecipient);
        }
        if amount <= Decimal::ZERO {
            return Err(TokenError::InvalidAmount);
        }
        let allowance = self.allowance(&owner, &caller);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount.to_string(),
                available: allowance.to_string(),
            });
        }
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.transfer(&owner, to, amount)?;
        self.allowances.insert((owner, caller), remaining);

        debug!(%owner, spender = %caller, %to, %amount, "delegated transfer executed");
        Ok(self
            .audit
            .record(AuditEvent::DelegatedTransferExecuted(DelegatedTransferExecuted {
                owner,
                spender: caller,
                to,
                amount,
            })))
    }

    /// Transfer the same sender's funds to many recipients as one
    /// all-or-nothing operation. Emits a single aggregate audit record.
    pub fn batch_transfer(
        &mut self,
        caller: PrincipalId,
        recipients: &[PrincipalId],
        amounts: &[Decimal],
    ) -> Result<AuditRecord, TokenError> {
        self.guarded(|t| t.batch_transfer_inner(caller, recipients, amounts))
    }

    fn batch_transfer_inner(
        &mut self,
        caller: PrincipalId,
        recipients: &[PrincipalId],
        amounts: &[Decimal],
    ) -> Result<AuditRecord, TokenError> {
        self.check_active()?;

        // Full validation pass before any balance moves
        let total = self.batch.validate(recipients, amounts)?;
        let available = self.balances.balance_of(&caller);
        if available < total {
            return Err(TokenError::Ledger(LedgerError::InsufficientFunds {
                required: total.to_string(),
                available: available.to_string(),
            }));
        }

        for (recipient, amount) in recipients.iter().zip(amounts.iter()) {
            self.balances.transfer(&caller, *recipient, *amount)?;
        }

        debug!(%caller, recipients = recipients.len(), %total, "batch transfer executed");
        Ok(self
            .audit
            .record(AuditEvent::BatchTransferExecuted(BatchTransferExecuted {
                sender: caller,
                recipients: recipients.len(),
                total,
            })))
    }

    // ───────────────────────── Minting ─────────────────────────

    /// Mint new supply to `to`. Requires the `Minter` role.
    pub fn mint(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.guarded(|t| t.mint_inner(caller, to, amount))
    }

    fn mint_inner(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
    ) -> Result<AuditRecord, TokenError> {
        self.check_active()?;
        if !self.access.has(Role::Minter, &caller) {
            return Err(TokenError::Unauthorized);
        }
        if to.is_nil() {
            return Err(TokenError::InvalidRecipient);
        }
        if amount <= Decimal::ZERO {
            return Err(TokenError::InvalidAmount);
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.credit(to, amount)?;
        self.total_supply = new_supply;

        debug!(minter = %caller, %to, %amount, "supply minted");
        Ok(self.audit.record(AuditEvent::MintExecuted(MintExecuted {
            minter: caller,
            to,
            amount,
        })))
    }

    // ───────────────────────── Role Management ─────────────────────────

    /// Grant the `Minter` role. Admin-only.
    pub fn add_minter(
        &mut self,
        caller: PrincipalId,
        principal: PrincipalId,
    ) -> Result<(), TokenError> {
        self.guarded(|t| t.add_minter_inner(caller, principal))
    }

    fn add_minter_inner(
        &mut self,
        caller: PrincipalId,
        principal: PrincipalId,
    ) -> Result<(), TokenError> {
        if !self.access.is_admin(&caller) {
            return Err(TokenError::Unauthorized);
        }
        if principal.is_nil() {
            return Err(TokenError::InvalidRecipient);
        }
        self.access.grant(&caller, Role::Minter, principal);
        self.audit.record(AuditEvent::RoleGranted(RoleGranted {
            admin: caller,
            principal,
            role: Role::Minter,
        }));
        Ok(())
    }

    /// Revoke the `Minter` role. Admin-only; revoking a principal that is
    /// not a minter is a no-op.
    pub fn remove_minter(
        &mut self,
        caller: PrincipalId,
        principal: PrincipalId,
    ) -> Result<(), TokenError> {
        self.guarded(|t| t.remove_minter_inner(caller, principal))
    }

    fn remove_minter_inner(
        &mut self,
        caller: PrincipalId,
        principal: PrincipalId,
    ) -> Result<(), TokenError> {
        if !self.access.is_admin(&caller) {
            return Err(TokenError::Unauthorized);
        }
        self.access.revoke(&caller, Role::Minter, &principal);
        self.audit.record(AuditEvent::RoleRevoked(RoleRevoked {
            admin: caller,
            principal,
            role: Role::Minter,
        }));
        Ok(())
    }

    // ───────────────────────── Pause ─────────────────────────

    /// Halt value-moving operations. Admin-only.
    pub fn pause(&mut self, caller: PrincipalId) -> Result<(), TokenError> {
        self.guarded(|t| t.set_paused(caller, true))
    }

    /// Resume normal operation. Admin-only.
    pub fn unpause(&mut self, caller: PrincipalId) -> Result<(), TokenError> {
        self.guarded(|t| t.set_paused(caller, false))
    }

    fn set_paused(&mut self, caller: PrincipalId, paused: bool) -> Result<(), TokenError> {
        if !self.access.is_admin(&caller) {
            return Err(TokenError::Unauthorized);
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

    /// Recorded total supply.
    pub fn total_supply(&self) -> Decimal {
        self.total_supply
    }

    /// Remaining delegated budget for (owner, spender).
    pub fn allowance(&self, owner: &PrincipalId, spender: &PrincipalId) -> Decimal {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Check if the ledger is paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Check if a principal holds the `Minter` role.
    pub fn is_minter(&self, principal: &PrincipalId) -> bool {
        self.access.has(Role::Minter, principal)
    }

    /// Check if a principal holds the `Admin` role.
    pub fn is_admin(&self, principal: &PrincipalId) -> bool {
        self.access.is_admin(principal)
    }

    /// The configured batch bound.
    pub fn max_batch_size(&self) -> usize {
        self.batch.max_batch_size()
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
    /// recorded total supply.
    pub fn check_supply_invariant(&self) -> bool {
        self.balances.total() == self.total_supply
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, TokenError>,
    ) -> Result<T, TokenError> {
        if !self.reentrancy.acquire() {
            return Err(TokenError::ReentrantCall);
        }
        let result = op(self);
        self.reentrancy.release();
        result
    }

    fn check_active(&self) -> Result<(), TokenError> {
        if self.pause.is_paused() {
            return Err(TokenError::Paused);
        }
        Ok(())
    }
}
