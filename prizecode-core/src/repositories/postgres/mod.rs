// src/repositories/postgres/mod.rs

pub mod codes;

pub use codes::PostgresCodeRepository;
