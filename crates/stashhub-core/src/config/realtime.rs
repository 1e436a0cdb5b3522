//! Change feed configuration.

use serde::{Deserialize, Serialize};

/// Change feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-table broadcast buffer size. Bursts beyond this coalesce into
    /// a single reload on the consumer side.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    64
}
