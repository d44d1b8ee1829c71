//! osr Core Types
//!
//! Pure types and logic with no I/O: the error taxonomy shared by every
//! decoding stage, game modes, format versions, modifier flags, accuracy,
//! hashes, and the tick-based timestamp encoding.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accuracy;
pub mod error;
pub mod hash;
pub mod mode;
pub mod mods;
pub mod time;
pub mod version;

// Re-exports
pub use accuracy::{HitCounts, compute_accuracy};
pub use error::{ReplayError, ReplayResult};
pub use hash::Md5Hex;
pub use mode::GameMode;
pub use mods::{Mods, decode_mods, decode_mods_string};
pub use time::{TICKS_PER_MICROSECOND, ticks_to_datetime};
pub use version::{FormatVersion, ScoreIdWidth};
