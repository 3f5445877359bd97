// File: prizecode-common/src/models/code.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a redemption code. `Used` is terminal; there is no
/// transition back to `Unused` and no code row is ever deleted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
pub enum CodeStatus {
    Unused,
    Used,
}

impl fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeStatus::Unused => write!(f, "unused"),
            CodeStatus::Used => write!(f, "used"),
        }
    }
}

impl FromStr for CodeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unused" => Ok(CodeStatus::Unused),
            "used" => Ok(CodeStatus::Used),
            _ => Err(format!("Unknown code status: {}", s)),
        }
    }
}

/// A single-use 5-digit redemption token.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Code {
    pub code_id: Uuid,
    /// Exactly 5 ASCII digits, unique across every code ever issued.
    pub value: String,
    pub status: CodeStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, at redemption. Present iff `status == Used`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl Code {
    pub fn is_redeemed(&self) -> bool {
        self.status == CodeStatus::Used
    }
}
