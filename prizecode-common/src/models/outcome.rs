// File: prizecode-common/src/models/outcome.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The immutable record of one redemption. Written in the same transaction
/// that flips the code to `used`; exactly one row per code, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RedemptionOutcome {
    pub outcome_id: Uuid,
    pub code_id: Uuid,
    /// Label of the prize tier that was drawn.
    pub outcome_label: String,
    /// Payout in minor currency units (cents). Zero for losing tiers.
    pub prize_value_cents: i64,
    /// The tier's configured weight at draw time, kept for audit.
    pub drawn_probability: f64,
    pub recorded_at: DateTime<Utc>,
}
