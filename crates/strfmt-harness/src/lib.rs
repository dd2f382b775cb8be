//! Fixture verification harness for strfmt.
//!
//! This crate provides:
//! - Fixture loading: JSON case files with typed arguments and expected output
//! - Fixture verify: render every case through `strfmt-core` and compare
//! - Structured logging: JSONL records for each verification run
//! - Report generation: markdown + JSON summaries with a digest index

#![forbid(unsafe_code)]

pub mod config;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
