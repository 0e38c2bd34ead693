//! Helpers for tests that run against a real SQLite database.
pub mod prepare_env;
pub mod seed;
