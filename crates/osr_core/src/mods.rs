//! Gameplay modifier flags.
//!
//! Mods are stored as a 32-bit mask in the replay header. [`decode_mods`]
//! renders the commonly shown subset as two-letter abbreviations.

use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// Gameplay modifiers active during a play
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u32 {
        /// NoFail
        const NO_FAIL = 1;
        /// Easy
        const EASY = 1 << 1;
        /// TouchDevice (replaced the unused NoVideo bit)
        const TOUCH_DEVICE = 1 << 2;
        /// Hidden
        const HIDDEN = 1 << 3;
        /// HardRock
        const HARD_ROCK = 1 << 4;
        /// SuddenDeath
        const SUDDEN_DEATH = 1 << 5;
        /// DoubleTime
        const DOUBLE_TIME = 1 << 6;
        /// Relax
        const RELAX = 1 << 7;
        /// HalfTime
        const HALF_TIME = 1 << 8;
        /// Nightcore, always set together with DoubleTime
        const NIGHTCORE = 1 << 9;
        /// Flashlight
        const FLASHLIGHT = 1 << 10;
        /// Autoplay
        const AUTOPLAY = 1 << 11;
        /// SpunOut
        const SPUN_OUT = 1 << 12;
        /// Relax2 / Autopilot
        const AUTOPILOT = 1 << 13;
        /// Perfect
        const PERFECT = 1 << 14;
        /// 4K
        const KEY4 = 1 << 15;
        /// 5K
        const KEY5 = 1 << 16;
        /// 6K
        const KEY6 = 1 << 17;
        /// 7K
        const KEY7 = 1 << 18;
        /// 8K
        const KEY8 = 1 << 19;
        /// FadeIn
        const FADE_IN = 1 << 20;
        /// Random
        const RANDOM = 1 << 21;
        /// Cinema (LastMod)
        const CINEMA = 1 << 22;
        /// TargetPractice; adds a hit count after the frame block
        const TARGET_PRACTICE = 1 << 23;
        /// 9K
        const KEY9 = 1 << 24;
        /// Coop
        const COOP = 1 << 25;
        /// 1K
        const KEY1 = 1 << 26;
        /// 3K
        const KEY3 = 1 << 27;
        /// 2K
        const KEY2 = 1 << 28;
        /// ScoreV2
        const SCORE_V2 = 1 << 29;
        /// Mirror
        const MIRROR = 1 << 30;

        /// Any of the mania key-count mods
        const KEY_MOD = Self::KEY4.bits() | Self::KEY5.bits() | Self::KEY6.bits()
            | Self::KEY7.bits() | Self::KEY8.bits();
    }
}

/// Abbreviation table, in emission order
const ABBREVIATIONS: [(Mods, &str); 15] = [
    (Mods::NO_FAIL, "NF"),
    (Mods::EASY, "EZ"),
    (Mods::HIDDEN, "HD"),
    (Mods::HARD_ROCK, "HR"),
    (Mods::SUDDEN_DEATH, "SD"),
    (Mods::DOUBLE_TIME, "DT"),
    (Mods::RELAX, "RX"),
    (Mods::HALF_TIME, "HT"),
    (Mods::NIGHTCORE, "NC"),
    (Mods::FLASHLIGHT, "FL"),
    (Mods::AUTOPLAY, "AT"),
    (Mods::SPUN_OUT, "SO"),
    (Mods::AUTOPILOT, "AP"),
    (Mods::PERFECT, "PF"),
    (Mods::TARGET_PRACTICE, "TP"),
];

/// Abbreviations of the mods set in `bits`, in table order.
///
/// Bits outside the table are ignored.
#[must_use]
pub fn decode_mods(bits: u32) -> Vec<&'static str> {
    Mods::from_bits_retain(bits).abbreviations()
}

/// Space-separated abbreviations, empty when no listed mod is set
#[must_use]
pub fn decode_mods_string(bits: u32) -> String {
    decode_mods(bits).join(" ")
}

impl Mods {
    /// Create from the signed value stored in the header
    #[must_use]
    pub const fn from_header(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }

    /// Abbreviations of the set mods, in table order
    #[must_use]
    pub fn abbreviations(&self) -> Vec<&'static str> {
        ABBREVIATIONS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, abbr)| *abbr)
            .collect()
    }

    /// Whether the target-practice hit count trails the frame block
    #[must_use]
    pub fn has_target_practice(&self) -> bool {
        self.contains(Self::TARGET_PRACTICE)
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrs = self.abbreviations();
        if abbrs.is_empty() {
            write!(f, "NM")
        } else {
            write!(f, "{}", abbrs.join(""))
        }
    }
}

// Serialized as the raw mask so unknown bits survive
impl Serialize for Mods {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mods {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Mods::from_bits_retain(bits))
    }
}
