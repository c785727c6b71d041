//! `propdocs-cli` library crate.
//!
//! Re-exports the report builder for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod report;
