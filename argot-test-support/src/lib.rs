//! Shared test utilities used across argot crates.

pub mod property_profile;
pub mod tracing;
