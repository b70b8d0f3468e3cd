//! Integration test harness.

mod cli_test;
mod engine_test;
