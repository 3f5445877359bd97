// File: prizecode-core/src/services/code_ledger.rs

use std::sync::Arc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;
use prizecode_common::error::Error;
use prizecode_common::models::code::{Code, CodeStatus};
use prizecode_common::models::outcome::RedemptionOutcome;
use prizecode_common::traits::repository_traits::CodeRepository;
use crate::services::outcome_selector::OutcomeSelector;

/// Hard cap on one issuance request; larger requests are clamped.
pub const MAX_ISSUE_BATCH: usize = 100;

pub type CodeValueSource = Box<dyn Fn() -> String + Send + Sync>;

/// Front door for the three ledger operations. Owns no state of its own;
/// all coordination happens at the store's transaction boundary.
pub struct CodeLedger {
    repo: Arc<dyn CodeRepository>,
    selector: Arc<OutcomeSelector>,
    value_source: CodeValueSource,
}

impl CodeLedger {
    pub fn new(
        repo: Arc<dyn CodeRepository>,
        selector: Arc<OutcomeSelector>,
    ) -> Self {
        Self {
            repo,
            selector,
            value_source: Box::new(random_code_value),
        }
    }

    /// Swap out the value generator (tests use this to force collisions).
    pub fn with_value_source(mut self, source: CodeValueSource) -> Self {
        self.value_source = source;
        self
    }

    /// Generate up to `count` new unused codes, clamped to `MAX_ISSUE_BATCH`.
    /// A uniqueness collision on a candidate value regenerates that slot
    /// without the caller ever seeing it. The batch is one transaction: a
    /// failure partway through commits nothing, so the call is safe to
    /// retry as a whole.
    pub async fn issue(&self, count: usize) -> Result<Vec<Code>, Error> {
        let count = count.min(MAX_ISSUE_BATCH);
        let issued = self.repo.insert_codes(count, &*self.value_source).await?;
        info!("issued {} new code(s)", issued.len());
        Ok(issued)
    }

    /// Advisory, lock-free status check. A code reported unused here can
    /// still lose a race against an in-flight redeem.
    pub async fn verify(&self, value: &str) -> Result<Code, Error> {
        validate_code_value(value)?;
        match self.repo.get_code_by_value(value).await? {
            None => Err(Error::NotFound(value.to_string())),
            Some(code) if code.is_redeemed() => Err(Error::AlreadyUsed(value.to_string())),
            Some(code) => Ok(code),
        }
    }

    /// Claim a code and draw its prize, exactly once. All the atomicity
    /// lives in the repository transaction; a failure here leaves the code
    /// in its prior state and the same value can be retried.
    pub async fn redeem(&self, value: &str) -> Result<RedemptionOutcome, Error> {
        validate_code_value(value)?;
        let outcome = self
            .repo
            .redeem_code(value, self.selector.as_ref())
            .await?;
        info!(
            "code {} redeemed: tier '{}' paying {} cents",
            value, outcome.outcome_label, outcome.prize_value_cents
        );
        Ok(outcome)
    }

    pub async fn outcome_for_code(&self, code_id: Uuid) -> Result<Option<RedemptionOutcome>, Error> {
        self.repo.get_outcome_for_code(code_id).await
    }

    pub async fn list_codes(&self, status: Option<CodeStatus>) -> Result<Vec<Code>, Error> {
        self.repo.list_codes(status).await
    }
}

/// Codes are exactly 5 ASCII digits. Checked before any storage round trip.
pub fn validate_code_value(value: &str) -> Result<(), Error> {
    if value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::InvalidFormat(format!(
            "expected exactly 5 digits, got '{}'",
            value
        )))
    }
}

fn random_code_value() -> String {
    format!("{:05}", rand::rng().random_range(0..100_000u32))
}
