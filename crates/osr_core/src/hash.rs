//! Content hashes carried as hex text in the replay header.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An MD5 digest as written in the header: 32 lowercase hex characters.
///
/// The text is kept verbatim. Unsubmitted replays may carry an empty string,
/// and nothing stops a foreign writer from putting arbitrary text here, so
/// validity is reported rather than enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Md5Hex(String);

impl Md5Hex {
    /// The number of hex characters in a digest
    pub const HEX_LEN: usize = 32;

    /// Wrap header text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Hex text as read
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the header carried no hash
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the text is a well-formed 32-character hex digest
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.to_bytes().is_some()
    }

    /// Decode to the 16 digest bytes
    #[must_use]
    pub fn to_bytes(&self) -> Option<[u8; 16]> {
        if self.0.len() != Self::HEX_LEN {
            return None;
        }
        let mut out = [0u8; 16];
        hex::decode_to_slice(&self.0, &mut out).ok()?;
        Some(out)
    }
}

impl fmt::Display for Md5Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Md5Hex {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<[u8; 16]> for Md5Hex {
    fn from(bytes: [u8; 16]) -> Self {
        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for Md5Hex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
