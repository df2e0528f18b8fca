//! Integration test modules

pub mod error_scenarios;
pub mod fixtures;
pub mod pipeline_test;
