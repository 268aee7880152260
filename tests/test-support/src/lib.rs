//! Test support utilities for shep integration tests
//!
//! This crate provides shared test helpers and utilities for integration tests.
//! It's designed to be used only during development and testing, not published.

pub mod laravel;
pub mod test_env;

// Re-export commonly used items for convenience
pub use laravel::{ENV_TEMPLATE, create_laravel_skeleton, read_env_value};
pub use test_env::CliTestEnvironment;
