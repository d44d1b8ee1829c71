//! Tick timestamps.
//!
//! The header stores the play time as a count of 100-nanosecond ticks since
//! 0001-01-01T00:00:00 UTC.

use crate::error::{ReplayError, ReplayResult};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Ticks per microsecond
pub const TICKS_PER_MICROSECOND: i64 = 10;

/// Ticks between the tick epoch and the Unix epoch
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Convert a tick count to a UTC timestamp.
///
/// Sub-microsecond ticks are floored away.
///
/// # Errors
///
/// Returns [`ReplayError::InvalidTimestamp`] if the result falls outside the
/// representable calendar range.
pub fn ticks_to_datetime(ticks: i64) -> ReplayResult<DateTime<Utc>> {
    let micros = ticks.div_euclid(TICKS_PER_MICROSECOND);
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(TimeDelta::microseconds(micros)))
        .map(|naive| naive.and_utc())
        .ok_or(ReplayError::InvalidTimestamp { ticks })
}

/// Convert a UTC timestamp back to a tick count, microsecond precision
#[must_use]
pub fn datetime_to_ticks(time: &DateTime<Utc>) -> i64 {
    UNIX_EPOCH_TICKS + time.timestamp_micros() * TICKS_PER_MICROSECOND
}
