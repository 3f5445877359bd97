// File: prizecode-common/src/traits/selector_traits.rs

use crate::models::prize::PrizeTier;

/// Draws one prize tier. Implementations must be pure with respect to storage:
/// no side effects, so a draw whose surrounding transaction rolls back leaves
/// nothing behind. The repository layer calls this inside the redeem
/// transaction, after the code row is locked and confirmed unused.
pub trait PrizeDraw: Send + Sync {
    fn draw(&self) -> PrizeTier;
}
