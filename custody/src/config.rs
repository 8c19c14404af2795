//! Configuration for the custody engine

use serde::{Deserialize, Serialize};

/// Default bound on batch-transfer recipient lists
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of recipients in a single batch transfer
    pub max_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}
