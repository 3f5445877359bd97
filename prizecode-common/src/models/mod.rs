// File: prizecode-common/src/models/mod.rs
pub mod code;
pub mod outcome;
pub mod prize;

pub use code::{Code, CodeStatus};
pub use outcome::RedemptionOutcome;
pub use prize::PrizeTier;
