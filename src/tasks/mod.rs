//! # Task abstractions and specifications.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing async units of work with lifecycle hooks
//! - [`Outcome`] - tagged control-flow result (success / skip / retry / fail)
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskSpec`] / [`TaskRef`] - task bundled with its run-scoped state
//! - [`TaskSet`] - ordered, identity-deduplicated collection of tasks
//! - [`Retries`] - bounded retry counter

mod outcome;
mod retries;
mod set;
mod spec;
mod task;
mod task_fn;

pub use outcome::Outcome;
pub use retries::Retries;
pub use set::TaskSet;
pub use spec::{TaskRef, TaskSpec};
pub use task::Task;
pub use task_fn::TaskFn;
