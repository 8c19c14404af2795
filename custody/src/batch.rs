//! Bounded multi-recipient transfers
//!
//! The coordinator validates an entire batch before any balance moves.
//! A batch that passes the full validation pass cannot fail while being
//! applied, which is what makes the operation all-or-nothing.

use rust_decimal::Decimal;
use types::ids::PrincipalId;

use crate::errors::{LedgerError, TokenError};

/// Validates batch transfers against a fixed recipient-count bound.
#[derive(Debug, Clone)]
pub struct BatchTransferCoordinator {
    max_batch_size: usize,
}

impl BatchTransferCoordinator {
    /// Create a coordinator with the given bound.
    ///
    /// # Panics
    /// Panics if `max_batch_size` is zero.
    pub fn new(max_batch_size: usize) -> Self {
        assert!(max_batch_size > 0, "max_batch_size must be positive");
        Self { max_batch_size }
    }

    /// The configured recipient-count bound.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Run the full validation pass over a batch and return its total.
    ///
    /// Checks, in order: array lengths match, batch is non-empty, batch is
    /// within the bound, every recipient is non-nil, every amount is
    /// positive, and the total accumulates without overflow. Performs no
    /// mutation; the caller checks the sender's balance against the
    /// returned total before applying the per-recipient transfers.
    pub fn validate(
        &self,
        recipients: &[PrincipalId],
        amounts: &[Decimal],
    ) -> Result<Decimal, TokenError> {
        if recipients.len() != amounts.len() {
            return Err(TokenError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        if recipients.is_empty() {
            return Err(TokenError::EmptyBatch);
        }
        if recipients.len() > self.max_batch_size {
            return Err(TokenError::BatchTooLarge {
                len: recipients.len(),
                max: self.max_batch_size,
            });
        }

        let mut total = Decimal::ZERO;
        for (recipient, amount) in recipients.iter().zip(amounts.iter()) {
            if recipient.is_nil() {
                return Err(TokenError::InvalidRecipient);
            }
            if *amount <= Decimal::ZERO {
                return Err(TokenError::InvalidAmount);
            }
            total = total
                .checked_add(*amount)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> BatchTransferCoordinator {
        BatchTransferCoordinator::new(100)
    }

    fn recipients(n: usize) -> Vec<PrincipalId> {
        (0..n).map(|_| PrincipalId::new()).collect()
    }

    #[test]
    fn test_validate_returns_total() {
        let total = coordinator()
            .validate(&recipients(3), &[Decimal::from(1), Decimal::from(2), Decimal::from(3)])
            .unwrap();
        assert_eq!(total, Decimal::from(6));
    }

    #[test]
    fn test_length_mismatch() {
        let result = coordinator().validate(&recipients(2), &[Decimal::ONE]);
        assert_eq!(
            result,
            Err(TokenError::LengthMismatch {
                recipients: 2,
                amounts: 1
            })
        );
    }

    #[test]
    fn test_empty_batch() {
        let result = coordinator().validate(&[], &[]);
        assert_eq!(result, Err(TokenError::EmptyBatch));
    }

    #[test]
    fn test_batch_too_large() {
        let amounts = vec![Decimal::ONE; 101];
        let result = coordinator().validate(&recipients(101), &amounts);
        assert_eq!(result, Err(TokenError::BatchTooLarge { len: 101, max: 100 }));
    }

    #[test]
    fn test_nil_recipient_rejected() {
        let mut list = recipients(2);
        list[1] = PrincipalId::nil();
        let result = coordinator().validate(&list, &[Decimal::ONE, Decimal::ONE]);
        assert_eq!(result, Err(TokenError::InvalidRecipient));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let result = coordinator().validate(&recipients(2), &[Decimal::ONE, Decimal::ZERO]);
        assert_eq!(result, Err(TokenError::InvalidAmount));

        let result = coordinator().validate(&recipients(1), &[Decimal::from(-5)]);
        assert_eq!(result, Err(TokenError::InvalidAmount));
    }

    #[test]
    fn test_total_overflow_rejected() {
        let result = coordinator().validate(&recipients(2), &[Decimal::MAX, Decimal::ONE]);
        assert_eq!(result, Err(TokenError::Ledger(LedgerError::Overflow)));
    }

    #[test]
    #[should_panic(expected = "max_batch_size must be positive")]
    fn test_zero_bound_rejected() {
        BatchTransferCoordinator::new(0);
    }
}
