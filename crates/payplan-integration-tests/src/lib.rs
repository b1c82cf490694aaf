//! Integration test crate for payplan.
//!
//! This crate has no library code. It only contains integration tests that
//! run the calculators against a mirrored store across workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p payplan-integration-tests
//! ```
