//! gencheck - Exercise a project's code generators and verify their output
//!
//! This crate provides the core library functionality for gencheck,
//! including variation expansion, generator scheduling, root-state backup,
//! lint/typecheck gates and cleanup.

pub mod core;
pub mod generator;
pub mod ops;
pub mod util;

/// Test utilities and mocks for gencheck unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted generator, a scripted gate runner
/// and a front-end project fixture.
#[cfg(test)]
pub mod test_support;

pub use core::variation::{GeneratorKind, VariationSpec};
pub use generator::{GenerationResult, Generator};
pub use ops::run::{Orchestrator, RunOptions, RunReport};
pub use util::context::HarnessContext;
