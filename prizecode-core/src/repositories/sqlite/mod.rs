// src/repositories/sqlite/mod.rs

pub mod codes;

pub use codes::SqliteCodeRepository;
