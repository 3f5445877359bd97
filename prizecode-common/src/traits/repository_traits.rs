// File: prizecode-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use uuid::Uuid;
use crate::error::Error;
use crate::models::code::{Code, CodeStatus};
use crate::models::outcome::RedemptionOutcome;
use crate::traits::selector_traits::PrizeDraw;

/// How many fresh values to try for one batch slot before giving up.
/// Collisions are rare until the 5-digit space fills up, so the budget is
/// generous.
pub const UNIQUENESS_RETRY_LIMIT: u32 = 32;

/// Storage contract for the code ledger. Implementations own the transaction
/// boundaries; every method leaves the store unchanged when it returns an
/// error.
#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Insert `count` freshly generated code rows in one transaction. A
    /// candidate value that collides with an existing row is regenerated
    /// from `next_value` without surfacing an error; a slot that exhausts
    /// `UNIQUENESS_RETRY_LIMIT` fails the call with `UniquenessConflict`
    /// and rolls back every slot, so a failed batch commits nothing.
    async fn insert_codes(
        &self,
        count: usize,
        next_value: &(dyn Fn() -> String + Send + Sync),
    ) -> Result<Vec<Code>, Error>;

    /// Lock-free lookup by value. Advisory with respect to redemption.
    async fn get_code_by_value(&self, value: &str) -> Result<Option<Code>, Error>;

    /// The redemption transaction. Atomically: locate and lock the code row,
    /// fail `NotFound`/`AlreadyUsed` with no side effects, draw one tier from
    /// `selector`, flip the code to used, and insert the outcome row. Either
    /// everything commits or nothing does.
    async fn redeem_code(
        &self,
        value: &str,
        selector: &dyn PrizeDraw,
    ) -> Result<RedemptionOutcome, Error>;

    /// Audit lookup; at most one outcome can exist per code.
    async fn get_outcome_for_code(&self, code_id: Uuid) -> Result<Option<RedemptionOutcome>, Error>;

    async fn list_codes(&self, status: Option<CodeStatus>) -> Result<Vec<Code>, Error>;
}
