//! Outbound invocation of externally supplied code
//!
//! The vault hands control to a caller-specified target only after its own
//! bookkeeping is committed, so a target that calls back in sees fully
//! updated state. Targets report their outcome as a value; a failed
//! invocation never unwinds the executor, and no artificial execution
//! budget is imposed on the target beyond the host's own limits.

use serde::{Deserialize, Serialize};
use types::ids::PrincipalId;

use crate::vault::CustodyVault;

/// Outcome of an external invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    /// A successful invocation carrying `return_data`.
    pub fn ok(return_data: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            return_data: return_data.into(),
        }
    }

    /// A failed invocation with no return data.
    pub fn failed() -> Self {
        Self {
            success: false,
            return_data: Vec::new(),
        }
    }
}

/// Externally supplied, untrusted code the vault can transfer control to.
///
/// The vault passes itself back into the target, so a target may attempt
/// to call vault operations while the outer invocation is still on the
/// stack. The reentrancy guard rejects such calls; everything the outer
/// operation committed before the hand-off is visible to the target.
pub trait CallTarget {
    /// Principal identity of the target.
    fn id(&self) -> PrincipalId;

    /// Handle an invocation carrying `payload`.
    fn invoke(&mut self, vault: &mut CustodyVault, payload: &[u8]) -> CallOutcome;
}

/// Dispatches outbound invocations.
///
/// Stateless: authorization, target validation, and the audit record all
/// belong to the vault entry point that reaches the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalCallExecutor;

impl ExternalCallExecutor {
    /// Invoke `target`, reporting the outcome as a value.
    pub fn invoke(
        vault: &mut CustodyVault,
        target: &mut dyn CallTarget,
        payload: &[u8],
    ) -> CallOutcome {
        target.invoke(vault, payload)
    }
}
