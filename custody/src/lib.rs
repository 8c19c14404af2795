//! Guarded Ledger State Machine for Custody & Settlement
//!
//! This crate implements a custody engine: it holds numeric balances
//! attributable to principals and mediates transfers of value, including
//! transfers that hand control to externally supplied, untrusted code.
//!
//! # Modules
//! - `errors`: Engine-specific error types
//! - `events`: Audit events and the append-only audit log
//! - `security`: Shared security primitives (reentrancy guard, access control, pause)
//! - `config`: Engine configuration
//! - `ledger`: Balance bookkeeping
//! - `batch`: Bounded multi-recipient transfer validation
//! - `token`: Supply-conserving token ledger
//! - `executor`: Outbound invocation of external targets
//! - `vault`: Reserve-conserving custody vault
//!
//! # Version
//! v0.1.0 — Initial implementation

pub mod batch;
pub mod config;
pub mod errors;
pub mod events;
pub mod executor;
pub mod ledger;
pub mod security;
pub mod token;
pub mod vault;

/// Engine API version — frozen after release
pub const ENGINE_VERSION: &str = "0.1.0";
