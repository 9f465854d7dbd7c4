//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: a unit of work with lifecycle hooks
//! (`unless`, `set_up`, `run`, `tear_down`) that reports its control flow
//! through [`Outcome`].
//!
//! Run-scoped engine state (retry counter, fail-on-error flag, success flag)
//! does not live in the task; it lives in the [`TaskSpec`](crate::TaskSpec)
//! that wraps it. The payload is not stored either: the runner lends it to the
//! task for the duration of each hook.

use async_trait::async_trait;

use crate::error::TaskError;
use crate::payload::Payload;
use crate::tasks::outcome::Outcome;

/// # Unit of work executed by a [`Runner`](crate::Runner).
///
/// Only [`run`](Task::run) is required. Hooks take `&self`; tasks that keep
/// counters or connections across attempts use interior mutability.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskchain::{JsonPayload, Outcome, Task, TaskError};
///
/// struct Greet;
///
/// #[async_trait]
/// impl Task<JsonPayload> for Greet {
///     fn name(&self) -> &str { "greet" }
///
///     fn unless(&self, payload: &JsonPayload) -> bool {
///         payload.get("greeted").is_none()
///     }
///
///     async fn run(&self, payload: &mut JsonPayload) -> Result<Outcome, TaskError> {
///         payload.insert("greeted", true);
///         Ok(Outcome::ok())
///     }
/// }
/// ```
#[async_trait]
pub trait Task<P: Payload>: Send + Sync + 'static {
    /// Human-readable name (for logs and events).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Precondition check; `false` skips the task entirely.
    ///
    /// Must be a pure read: it may be evaluated again on every retry.
    fn unless(&self, _payload: &P) -> bool {
        true
    }

    /// Acquires resources right before [`run`](Task::run).
    ///
    /// Sees the payload as left by the previous tasks (e.g. connection
    /// settings placed there by an earlier step).
    async fn set_up(&self, _payload: &P) -> Result<(), TaskError> {
        Ok(())
    }

    /// The task body.
    async fn run(&self, payload: &mut P) -> Result<Outcome, TaskError>;

    /// Releases resources after a [`run`](Task::run) that returned
    /// [`Outcome::Success`].
    ///
    /// With [`TeardownPolicy::Always`](crate::TeardownPolicy::Always) it is also
    /// called after skip, retry, fail and faulting runs. `payload` reflects
    /// what [`run`](Task::run) wrote.
    async fn tear_down(&self, _payload: &P) -> Result<(), TaskError> {
        Ok(())
    }
}
