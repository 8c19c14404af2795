//! Engine-specific error types
//!
//! Comprehensive error taxonomy for ledger, token, and vault operations.
//! Every failure aborts the whole invocation; no operation reports success
//! while leaving a partial mutation behind.

use thiserror::Error;

/// Balance bookkeeping errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Token ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Ledger is paused")]
    Paused,

    #[error("Reentrant call rejected")]
    ReentrantCall,

    #[error("Invalid recipient: nil principal")]
    InvalidRecipient,

    #[error("Invalid spender: nil principal")]
    InvalidSpender,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance { required: String, available: String },

    #[error("Batch length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },

    #[error("Empty batch: no recipients to transfer to")]
    EmptyBatch,

    #[error("Batch too large: {len} recipients exceeds limit {max}")]
    BatchTooLarge { len: usize, max: usize },
}

/// Custody vault errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Vault is paused")]
    Paused,

    #[error("Reentrant call rejected")]
    ReentrantCall,

    #[error("Invalid recipient: nil principal")]
    InvalidRecipient,

    #[error("Invalid call target: nil principal")]
    InvalidTarget,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Value release rejected by recipient")]
    ReleaseFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::InsufficientFunds {
            required: "5".to_string(),
            available: "3".to_string(),
        };
        assert_eq!(err.to_string(), "Insufficient funds: required 5, available 3");
    }

    #[test]
    fn test_token_error_from_ledger() {
        let ledger_err = LedgerError::Overflow;
        let token_err: TokenError = ledger_err.into();
        assert!(matches!(token_err, TokenError::Ledger(LedgerError::Overflow)));
    }

    #[test]
    fn test_vault_error_from_ledger() {
        let ledger_err = LedgerError::Overflow;
        let vault_err: VaultError = ledger_err.into();
        assert!(matches!(vault_err, VaultError::Ledger(LedgerError::Overflow)));
    }

    #[test]
    fn test_batch_error_display() {
        let err = TokenError::BatchTooLarge { len: 101, max: 100 };
        assert!(err.to_string().contains("101"));
        assert!(err.to_string().contains("100"));
    }
}
