//! Testing infrastructure for runlog integration tests.
//!
//! - `TestWorld`: isolated directory, cwd and environment for CLI runs
//! - `fixtures`: the canonical sample transcript and transcript builders
//! - `assertions`: artifact reference and telemetry JSON checks

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
