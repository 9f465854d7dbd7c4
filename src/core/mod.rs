//! Runtime core: execution engine and chaining.
//!
//! This module contains the embedded implementation of the taskchain runner.
//! The public API from this module is [`Runner`] (plus its builder and
//! configuration types).
//!
//! Internal modules:
//! - [`machine`]: per-task state machine (unless → set_up → run → tear_down → outcome);
//! - [`runner`]: run-level algorithm, failure wrapping, event publishing;
//! - [`chain`]: attached runners and their notification;
//! - [`builder`]: one-expression runner construction;
//! - [`config`]: runner configuration and policies.

mod builder;
mod chain;
mod config;
mod machine;
mod runner;

pub use builder::RunnerBuilder;
pub use config::{ChainPolicy, RunnerConfig, TeardownPolicy};
pub use runner::Runner;
