//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Replay decoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Memory limit for the LZMA decoder in bytes (`None` = unlimited)
    pub memory_limit: Option<usize>,
    /// Read a lone `0x00` in place of a header string as an empty string
    /// instead of failing with a malformed varint
    pub allow_absent_strings: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            memory_limit: None,
            allow_absent_strings: false,
        }
    }
}

impl DecodeConfig {
    /// Set the LZMA memory limit
    #[must_use]
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = Some(limit);
        self
    }

    /// Accept absent header strings
    #[must_use]
    pub fn with_absent_strings(mut self, allow: bool) -> Self {
        self.allow_absent_strings = allow;
        self
    }
}
