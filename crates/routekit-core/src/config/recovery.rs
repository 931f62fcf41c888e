//! Panic recovery configuration.

use serde::{Deserialize, Serialize};

/// Settings for the panic recovery layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Emit an `error` event for every recovered panic.
    #[serde(default = "default_true")]
    pub log_panics: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            log_panics: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
