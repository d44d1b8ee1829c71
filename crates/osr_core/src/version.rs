//! Replay format versions.
//!
//! The version is a date stamp (`yyyymmdd`) written by the game client. A few
//! fixed dates change the layout of the frame section and its trailer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client format version carried in the replay header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatVersion(i32);

/// Encoded width of the trailing online score id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreIdWidth {
    /// 4-byte signed integer
    Int32,
    /// 8-byte signed integer
    Int64,
}

impl FormatVersion {
    /// First version with a 32-bit score id after the frame block
    pub const SCORE_ID_32: i32 = 20121008;
    /// First version that embeds the random seed as a sentinel frame
    pub const SEED_SENTINEL: i32 = 20130319;
    /// First version with a 64-bit score id after the frame block
    pub const SCORE_ID_64: i32 = 20140721;

    /// Create from raw value
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Whether a `-12345` frame delta marks the random seed
    #[must_use]
    pub const fn has_seed_sentinel(&self) -> bool {
        self.0 >= Self::SEED_SENTINEL
    }

    /// Width of the score id following the frame block, if one is present
    #[must_use]
    pub const fn score_id_width(&self) -> Option<ScoreIdWidth> {
        if self.0 >= Self::SCORE_ID_64 {
            Some(ScoreIdWidth::Int64)
        } else if self.0 >= Self::SCORE_ID_32 {
            Some(ScoreIdWidth::Int32)
        } else {
            None
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for FormatVersion {
    fn from(value: i32) -> Self {
        Self(value)
    }
}
