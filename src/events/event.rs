//! # Runtime events emitted by the runner.
//!
//! The [`EventKind`] enum classifies events in two groups:
//! - **Run events**: `run.start`, `run.success`, `run.failure`
//! - **Task events**: `task.unless-skip`, `task.start`, `task.success`,
//!   `task.retry`, `task.skip`, `task.failure`
//!
//! The [`Event`] struct carries the metadata attached to each kind. It borrows
//! the payload (and the failure, for failure events), so subscribers see the
//! live state without any copy; events only exist while they are dispatched.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically across all runners in the process.
//!
//! ## Example
//! ```rust
//! use taskchain::{Event, EventKind, JsonPayload};
//!
//! let payload = JsonPayload::new();
//! let ev: Event<'_, JsonPayload> = Event::new(EventKind::TaskSuccess, "main")
//!     .with_payload(&payload)
//!     .with_exit_code(0)
//!     .with_attempt(1);
//!
//! assert_eq!(ev.kind.as_str(), "task.success");
//! assert_eq!(ev.exit_code, Some(0));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{RunnerError, TaskFailure};
use crate::payload::Payload;
use crate::tasks::TaskRef;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Run events ===
    /// Runner is about to execute its task set.
    ///
    /// Sets:
    /// - `task_count`: number of tasks in the set
    /// - `payload`
    RunStart,

    /// Every task finished without aborting the run (emitted before chained
    /// runners are notified).
    ///
    /// Sets:
    /// - `payload`
    RunSuccess,

    /// A task aborted the run.
    ///
    /// Sets:
    /// - `task`: the failing task
    /// - `error`: the failure
    RunFailure,

    // === Task events ===
    /// `unless()` returned false; the task is skipped without running.
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt`
    TaskUnlessSkip,

    /// Task is starting an attempt (`set_up` follows).
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt` (1-based)
    TaskStart,

    /// Task completed through the success path.
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt`, `exit_code`
    TaskSuccess,

    /// Task asked to be retried; the next attempt follows immediately.
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt` (the attempt that asked)
    TaskRetry,

    /// Task asked to be skipped.
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt`
    TaskSkip,

    /// Task reported failure (explicitly or via nonzero exit code).
    ///
    /// Sets:
    /// - `task`, `payload`, `attempt`, `exit_code` (when known), `error`
    TaskFailure,
}

impl EventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [EventKind; 9] = [
        EventKind::RunStart,
        EventKind::RunSuccess,
        EventKind::RunFailure,
        EventKind::TaskUnlessSkip,
        EventKind::TaskStart,
        EventKind::TaskSuccess,
        EventKind::TaskRetry,
        EventKind::TaskSkip,
        EventKind::TaskFailure,
    ];

    /// Stable dotted event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RunStart => "run.start",
            EventKind::RunSuccess => "run.success",
            EventKind::RunFailure => "run.failure",
            EventKind::TaskUnlessSkip => "task.unless-skip",
            EventKind::TaskStart => "task.start",
            EventKind::TaskSuccess => "task.success",
            EventKind::TaskRetry => "task.retry",
            EventKind::TaskSkip => "task.skip",
            EventKind::TaskFailure => "task.failure",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = RunnerError;

    /// Parses a dotted event name; unknown or empty names are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RunnerError::InvalidEventName { name: s.to_string() })
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
pub struct Event<'a, P: Payload> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the emitting runner.
    pub runner: Arc<str>,
    /// Task the event refers to, if any.
    pub task: Option<TaskRef<P>>,
    /// The payload as it is at emission time.
    pub payload: Option<&'a P>,
    /// Exit code reported by the task.
    pub exit_code: Option<i32>,
    /// Attempt number of the task (starting from 1).
    pub attempt: Option<u32>,
    /// Task count of the run (`run.start` only).
    pub task_count: Option<usize>,
    /// Failure that aborted the task or run.
    pub error: Option<&'a TaskFailure>,
}

impl<'a, P: Payload> Event<'a, P> {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, runner: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            runner: runner.into(),
            task: None,
            payload: None,
            exit_code: None,
            attempt: None,
            task_count: None,
            error: None,
        }
    }

    /// Attaches the task.
    #[inline]
    pub fn with_task(mut self, task: &TaskRef<P>) -> Self {
        self.task = Some(Arc::clone(task));
        self
    }

    /// Attaches the payload.
    #[inline]
    pub fn with_payload(mut self, payload: &'a P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attaches an exit code.
    #[inline]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches the task count.
    #[inline]
    pub fn with_task_count(mut self, n: usize) -> Self {
        self.task_count = Some(n);
        self
    }

    /// Attaches a failure.
    #[inline]
    pub fn with_error(mut self, error: &'a TaskFailure) -> Self {
        self.error = Some(error);
        self
    }

    /// Name of the attached task, if any.
    #[inline]
    pub fn task_name(&self) -> Option<&str> {
        self.task.as_deref().map(|t| t.name())
    }
}

impl<P: Payload> fmt::Debug for Event<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("kind", &self.kind)
            .field("runner", &self.runner)
            .field("task", &self.task_name())
            .field("exit_code", &self.exit_code)
            .field("attempt", &self.attempt)
            .field("task_count", &self.task_count)
            .field("error", &self.error.map(ToString::to_string))
            .finish()
    }
}
