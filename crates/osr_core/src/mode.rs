//! Game modes a replay can be recorded in.

use crate::error::ReplayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Game mode, stored as a single byte at the start of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Standard (circles)
    #[default]
    Standard,
    /// Taiko (drums)
    Taiko,
    /// Catch (fruits)
    Catch,
    /// Mania (keys)
    Mania,
}

impl GameMode {
    /// All modes in wire order
    pub const ALL: [GameMode; 4] = [Self::Standard, Self::Taiko, Self::Catch, Self::Mania];

    /// Wire value of this mode
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Taiko => 1,
            Self::Catch => 2,
            Self::Mania => 3,
        }
    }

    /// Lowercase display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Taiko => "taiko",
            Self::Catch => "catch",
            Self::Mania => "mania",
        }
    }
}

impl TryFrom<u8> for GameMode {
    type Error = ReplayError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Taiko),
            2 => Ok(Self::Catch),
            3 => Ok(Self::Mania),
            other => Err(ReplayError::UnknownMode(other)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
