// src/repositories/mod.rs

pub use prizecode_common::traits::repository_traits::CodeRepository;

pub use postgres::codes::PostgresCodeRepository;
pub use sqlite::codes::SqliteCodeRepository;

pub mod postgres;
pub mod sqlite;
