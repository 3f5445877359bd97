// src/lib.rs

pub mod db;
pub mod repositories;
pub mod services;

pub use db::Database;
pub use prizecode_common::error::Error;
