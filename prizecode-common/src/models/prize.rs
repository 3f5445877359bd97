// File: prizecode-common/src/models/prize.rs

use serde::{Deserialize, Serialize};

/// One configured prize level. Order within the table matters: the selector
/// walks tiers in configured order, so ties on the cumulative boundary go to
/// the earlier tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub label: String,
    /// Draw probability in [0,1]. The whole table must sum to 1.0.
    pub weight: f64,
    /// Payout in minor currency units; zero marks a losing tier.
    pub payout_cents: i64,
}

impl PrizeTier {
    pub fn new(label: impl Into<String>, weight: f64, payout_cents: i64) -> Self {
        Self {
            label: label.into(),
            weight,
            payout_cents,
        }
    }
}
