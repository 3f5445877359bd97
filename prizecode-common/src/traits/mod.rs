// File: prizecode-common/src/traits/mod.rs
pub mod repository_traits;
pub mod selector_traits;
