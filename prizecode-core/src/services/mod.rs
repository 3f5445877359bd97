// src/services/mod.rs

pub mod code_ledger;
pub mod outcome_selector;

pub use code_ledger::{CodeLedger, MAX_ISSUE_BATCH};
pub use outcome_selector::{OutcomeSelector, RandomSource, ThreadRandomSource, default_prize_table};
