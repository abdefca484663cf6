//! Shared helpers for integration tests

pub mod store;

pub use store::create_test_env;
