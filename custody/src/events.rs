//! Audit events emitted by engine operations
//!
//! Every mutating operation appends a structured record to its instance's
//! audit log once its own state changes are applied. Records are immutable
//! and carry a monotonic sequence number plus a millisecond timestamp for
//! off-process observers.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::PrincipalId;

use crate::security::Role;

/// Direct transfer between two principals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferExecuted {
    pub from: PrincipalId,
    pub to: PrincipalId,
    pub amount: Decimal,
}

/// Transfer moved by a delegate out of an owner's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedTransferExecuted {
    pub owner: PrincipalId,
    pub spender: PrincipalId,
    pub to: PrincipalId,
    pub amount: Decimal,
}

/// Allowance set by an owner for a delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSet {
    pub owner: PrincipalId,
    pub spender: PrincipalId,
    pub amount: Decimal,
}

/// New supply minted to a recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintExecuted {
    pub minter: PrincipalId,
    pub to: PrincipalId,
    pub amount: Decimal,
}

/// Aggregate record for a multi-recipient transfer.
///
/// One record per batch regardless of recipient count, so audit volume
/// stays bounded independent of batch size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTransferExecuted {
    pub sender: PrincipalId,
    pub recipients: usize,
    pub total: Decimal,
}

/// Value taken into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceived {
    pub account: PrincipalId,
    pub amount: Decimal,
}

/// Value released from custody back to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalExecuted {
    pub account: PrincipalId,
    pub amount: Decimal,
}

/// Entire reserve drained by an administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyDrained {
    pub admin: PrincipalId,
    pub recipient: PrincipalId,
    pub amount: Decimal,
}

/// Outbound invocation issued to an external target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCallExecuted {
    pub target: PrincipalId,
    pub success: bool,
}

/// Role granted to a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGranted {
    pub admin: PrincipalId,
    pub principal: PrincipalId,
    pub role: Role,
}

/// Role revoked from a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRevoked {
    pub admin: PrincipalId,
    pub principal: PrincipalId,
    pub role: Role,
}

/// Pause circuit breaker toggled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseChanged {
    pub admin: PrincipalId,
    pub paused: bool,
}

/// Enum wrapper for all audit events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    TransferExecuted(TransferExecuted),
    DelegatedTransferExecuted(DelegatedTransferExecuted),
    ApprovalSet(ApprovalSet),
    MintExecuted(MintExecuted),
    BatchTransferExecuted(BatchTransferExecuted),
    DepositReceived(DepositReceived),
    WithdrawalExecuted(WithdrawalExecuted),
    EmergencyDrained(EmergencyDrained),
    ExternalCallExecuted(ExternalCallExecuted),
    RoleGranted(RoleGranted),
    RoleRevoked(RoleRevoked),
    PauseChanged(PauseChanged),
}

/// One entry in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Monotonic per-instance sequence number
    pub seq: u64,
    /// Unix timestamp, milliseconds
    pub at: i64,
    pub event: AuditEvent,
}

/// Append-only audit log owned by an engine instance.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    next_seq: u64,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, stamping it with the next sequence number and the
    /// current time. Returns the stored record.
    pub fn record(&mut self, event: AuditEvent) -> AuditRecord {
        let record = AuditRecord {
            seq: self.next_seq,
            at: Utc::now().timestamp_millis(),
            event,
        };
        self.next_seq += 1;
        self.records.push(record.clone());
        record
    }

    /// All records emitted so far.
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Drain all records (consume and clear). Sequence numbers keep
    /// increasing across drains.
    pub fn drain(&mut self) -> Vec<AuditRecord> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_event_serialization() {
        let event = TransferExecuted {
            from: PrincipalId::new(),
            to: PrincipalId::new(),
            amount: Decimal::from(1000),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: TransferExecuted = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_audit_record_serialization() {
        let mut log = AuditLog::new();
        let record = log.record(AuditEvent::PauseChanged(PauseChanged {
            admin: PrincipalId::new(),
            paused: true,
        }));
        let json = serde_json::to_string(&record).unwrap();
        let deser: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deser);
    }

    #[test]
    fn test_sequence_numbers_monotonic() {
        let mut log = AuditLog::new();
        let admin = PrincipalId::new();
        for expected in 0..5u64 {
            let record = log.record(AuditEvent::PauseChanged(PauseChanged {
                admin,
                paused: expected % 2 == 0,
            }));
            assert_eq!(record.seq, expected);
        }
        assert_eq!(log.records().len(), 5);
    }

    #[test]
    fn test_drain_clears_but_sequence_continues() {
        let mut log = AuditLog::new();
        let admin = PrincipalId::new();
        log.record(AuditEvent::PauseChanged(PauseChanged { admin, paused: true }));

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.records().is_empty());

        let next = log.record(AuditEvent::PauseChanged(PauseChanged { admin, paused: false }));
        assert_eq!(next.seq, 1);
    }

    #[test]
    fn test_batch_event_is_aggregate() {
        let event = BatchTransferExecuted {
            sender: PrincipalId::new(),
            recipients: 50,
            total: Decimal::from(5000),
        };
        let json = serde_json::to_string(&AuditEvent::BatchTransferExecuted(event.clone())).unwrap();
        let deser: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, AuditEvent::BatchTransferExecuted(event));
    }
}
