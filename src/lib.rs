//! # taskchain
//!
//! **Taskchain** is a sequential task runner for Rust.
//!
//! It executes an ordered set of tasks against one mutable payload, applies
//! per-task control flow (skip, bounded retry, fail), reports a single
//! run-level failure when a task aborts, and triggers chained runners once a
//! run has succeeded.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskSpec   │   │   TaskSpec   │   │   TaskSpec   │
//!     │   (task A)   │   │   (task B)   │   │   (task C)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └──────────────────┼──────────────────┘
//!                               ▼
//!                     TaskSet (insertion order)
//!                               │
//! ┌─────────────────────────────▼─────────────────────────────────────┐
//! │  Runner                                                           │
//! │  - TaskDriver (per-task state machine, retry loop)                │
//! │  - Dispatcher (publishes events to subscribers, in order)         │
//! │  - Chain (runners notified after success)                         │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │ &mut payload, one task at a time             │ same &mut payload
//!        ▼                                              ▼
//!   unless → set_up → run → tear_down            chained Runner::run ...
//! ```
//!
//! ### Lifecycle
//! ```text
//! Runner::run(&mut payload)
//!
//! for task in set {
//!   loop {
//!     ├─► unless() == false       ─► task.unless-skip, next task
//!     ├─► task.start, set_up(), run(payload)
//!     │       ├─ Success(code)    ─► tear_down(); code != 0 && fail_on_error ? Fail
//!     │       │                      else task.success, mark executed, next task
//!     │       ├─ Skip             ─► task.skip, next task
//!     │       ├─ Retry            ─► task.retry, retries.increase()?, loop again
//!     │       ├─ Fail             ─► task.failure, abort
//!     │       └─ Err(TaskError)   ─► abort
//!   }
//! }
//! abort ─► run.failure ─► Err(RunnerError::RunFailed)   (chain never runs)
//! done  ─► run.success ─► notify chained runners ─► Ok(payload)
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                          |
//! |-------------------|------------------------------------------------------------|---------------------------------------------|
//! | **Tasks**         | Define units of work with lifecycle hooks.                 | [`Task`], [`TaskFn`], [`Outcome`]           |
//! | **Specs**         | Run-scoped task state: retries, fail flag, success flag.   | [`TaskSpec`], [`TaskRef`], [`Retries`]      |
//! | **Execution**     | Run a task set, chain runners.                             | [`Runner`], [`TaskSet`]                     |
//! | **Events**        | Observe every lifecycle step.                              | [`Subscribe`], [`Event`], [`EventKind`]     |
//! | **Errors**        | Typed errors for configuration and run failures.           | [`RunnerError`], [`TaskFailure`]            |
//! | **Configuration** | Runner name, teardown and chain policies, task defaults.   | [`RunnerConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` subscriber that renders events via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskchain::{JsonPayload, Outcome, Runner, RunnerConfig, TaskError, TaskFn, TaskSet};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extract = TaskFn::spec("extract", |p: &mut JsonPayload| {
//!         p.insert("rows", 3);
//!         Ok::<_, TaskError>(Outcome::ok())
//!     });
//!     let load = TaskFn::spec("load", |p: &mut JsonPayload| {
//!         let rows = p.get("rows").and_then(|v| v.as_u64()).unwrap_or(0);
//!         p.insert("loaded", rows);
//!         Ok::<_, TaskError>(Outcome::ok())
//!     });
//!
//!     let report = Runner::with_tasks(
//!         RunnerConfig::named("report"),
//!         TaskSet::new().with(TaskFn::spec("report", |_: &mut JsonPayload| {
//!             Ok::<_, TaskError>(Outcome::ok())
//!         })),
//!     );
//!
//!     let mut main = Runner::with_tasks(RunnerConfig::named("etl"), TaskSet::new().with(extract).with(load));
//!     main.attach(Arc::new(report))?;
//!
//!     let mut payload = JsonPayload::new();
//!     main.run(&mut payload).await?;
//!     assert_eq!(payload.get("loaded").and_then(|v| v.as_u64()), Some(3));
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod payload;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use core::{ChainPolicy, Runner, RunnerBuilder, RunnerConfig, TeardownPolicy};
pub use error::{RetriesError, RunnerError, TaskError, TaskFailure};
pub use events::{Dispatcher, Event, EventKind};
pub use payload::{JsonPayload, Payload};
pub use subscribers::{FnSubscriber, Subscribe};
pub use tasks::{Outcome, Retries, Task, TaskFn, TaskRef, TaskSet, TaskSpec};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
