//! Unique identifier types for custody entities
//!
//! Principals use UUID v7 for time-sortable ordering, enabling efficient
//! chronological queries and replay capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a principal — an authorizable actor.
///
/// Uses UUID v7 for time-based sorting. The nil UUID is reserved as the
/// null identity: it can never be granted a role, hold a balance, or be
/// the target of a transfer or an external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Create a new PrincipalId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The null identity. Rejected by every operation that takes a
    /// recipient, spender, or call target.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Check whether this is the null identity
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id_creation() {
        let id1 = PrincipalId::new();
        let id2 = PrincipalId::new();
        assert_ne!(id1, id2, "PrincipalIds should be unique");
    }

    #[test]
    fn test_principal_id_nil() {
        let nil = PrincipalId::nil();
        assert!(nil.is_nil());
        assert!(!PrincipalId::new().is_nil());
    }

    #[test]
    fn test_principal_id_serialization() {
        let id = PrincipalId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: PrincipalId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_principal_id_from_uuid_round_trip() {
        let uuid = Uuid::now_v7();
        let id = PrincipalId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }
}
