//! Hit counts and weighted accuracy.

use serde::{Deserialize, Serialize};

/// Judgement counts recorded in the replay header.
///
/// Geki and katu carry mode-specific meaning (e.g. mania MAX/200 or taiko
/// finishers) and do not enter the accuracy formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HitCounts {
    /// 300 judgements
    pub n300: u16,
    /// 100 judgements
    pub n100: u16,
    /// 50 judgements
    pub n50: u16,
    /// Geki judgements
    pub ngeki: u16,
    /// Katu judgements
    pub nkatu: u16,
    /// Misses
    pub nmiss: u16,
}

impl HitCounts {
    /// Weighted accuracy as a percentage in `[0, 100]`
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        compute_accuracy(
            u32::from(self.n300),
            u32::from(self.n100),
            u32::from(self.n50),
            u32::from(self.nmiss),
        )
    }

    /// Number of judged objects counted by the accuracy formula
    #[must_use]
    pub fn judged(&self) -> u32 {
        u32::from(self.n300) + u32::from(self.n100) + u32::from(self.n50) + u32::from(self.nmiss)
    }
}

/// Weighted accuracy percentage.
///
/// `(n300 + n100/3 + n50/6) / max(total, 1) * 100`, so an all-zero record
/// yields `0.0`.
#[must_use]
pub fn compute_accuracy(n300: u32, n100: u32, n50: u32, nmiss: u32) -> f64 {
    let total = (u64::from(n300) + u64::from(n100) + u64::from(n50) + u64::from(nmiss)).max(1);
    let weighted = f64::from(n300) + f64::from(n100) / 3.0 + f64::from(n50) / 6.0;
    weighted / total as f64 * 100.0
}
