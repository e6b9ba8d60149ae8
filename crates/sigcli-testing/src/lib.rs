//! Testing infrastructure for sigcli tests.
//!
//! This crate provides utilities for writing integration tests:
//! - `fixtures`: Sample module registries and recording entrypoints
//! - `assertions`: Assertions over command trees and recorded calls
//! - `TestWorld`: Isolated runs of the demo binary

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{CallLog, ENTRYPOINT};
pub use world::{CliResult, TestWorld};
