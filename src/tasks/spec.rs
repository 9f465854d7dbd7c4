//! # Task specification for a run.
//!
//! Defines [`TaskSpec`], the handle the runner executes: a [`Task`] plus the
//! run-scoped state the engine owns on its behalf.
//!
//! - optional retry counter ([`Retries`]; absent = retries disallowed)
//! - `fail_on_error` flag (nonzero exit code aborts the run)
//! - `successfully executed` flag (set only by the runner)
//!
//! Specs are shared as [`TaskRef`] (`Arc<TaskSpec<P>>`). Identity is the
//! allocation, never the value: two specs wrapping equal tasks are distinct.
//! `TaskSpec` is deliberately not `Clone`; copying a spec would silently share
//! or fork its run state.
//!
//! A spec can be created:
//! - **Explicitly** with [`TaskSpec::new`] and the `with_*` modifiers
//! - **From config** with [`TaskSpec::with_defaults`] (inherit defaults)

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::RunnerConfig;
use crate::error::RetriesError;
use crate::payload::Payload;
use crate::tasks::{retries::Retries, task::Task};

/// Shared handle to a task specification.
pub type TaskRef<P> = Arc<TaskSpec<P>>;

/// A task bundled with its run-scoped engine state.
///
/// ## Example
/// ```rust
/// use taskchain::{JsonPayload, Outcome, TaskError, TaskFn, TaskSpec};
///
/// let spec = TaskSpec::new(TaskFn::new("flaky", |_: &mut JsonPayload| {
///     Ok::<_, TaskError>(Outcome::Retry)
/// }))
/// .with_max_retries(3)
/// .unwrap()
/// .with_fail_on_error(true);
///
/// assert_eq!(spec.max_retries().map(|r| r.max_retries()), Some(3));
/// assert!(spec.fail_on_error());
/// assert!(!spec.is_successfully_executed());
/// ```
pub struct TaskSpec<P: Payload> {
    task: Arc<dyn Task<P>>,
    retries: Mutex<Option<Retries>>,
    fail_on_error: AtomicBool,
    executed: AtomicBool,
}

impl<P: Payload> TaskSpec<P> {
    /// Creates a spec with no retry counter and `fail_on_error = false`.
    pub fn new(task: impl Task<P>) -> Self {
        Self::from_arc(Arc::new(task))
    }

    /// Creates a spec around an already shared task.
    ///
    /// Useful when the caller keeps its own handle to the concrete task type.
    /// Specs sharing one task instance count as the same member of a
    /// [`TaskSet`](crate::TaskSet), so the instance never runs twice in a set.
    pub fn from_arc(task: Arc<dyn Task<P>>) -> Self {
        Self {
            task,
            retries: Mutex::new(None),
            fail_on_error: AtomicBool::new(false),
            executed: AtomicBool::new(false),
        }
    }

    /// Creates a spec inheriting `fail_on_error` and the retry bound from config.
    ///
    /// `cfg.max_retries = 0` leaves the task without a retry counter.
    pub fn with_defaults(task: impl Task<P>, cfg: &RunnerConfig) -> Self {
        let spec = Self::new(task).with_fail_on_error(cfg.fail_on_error);
        if let Some(max) = cfg.default_max_retries() {
            if let Ok(retries) = Retries::try_from(max) {
                spec.bind_retries(retries);
            }
        }
        spec
    }

    /// Returns a spec with a retry counter bound.
    ///
    /// Accepts a [`Retries`] or a positive integer.
    pub fn with_max_retries<R>(self, retries: R) -> Result<Self, RetriesError>
    where
        R: TryInto<Retries>,
        RetriesError: From<R::Error>,
    {
        self.set_max_retries(retries)?;
        Ok(self)
    }

    /// Returns a spec with an updated `fail_on_error` flag.
    pub fn with_fail_on_error(self, fail_on_error: bool) -> Self {
        self.set_fail_on_error(fail_on_error);
        self
    }

    /// Wraps the spec into a shared [`TaskRef`].
    pub fn into_ref(self) -> TaskRef<P> {
        Arc::new(self)
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &Arc<dyn Task<P>> {
        &self.task
    }

    /// Convenience: returns the task name.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Binds a retry counter, replacing any previous one.
    ///
    /// Accepts a [`Retries`] or a positive integer; a zero or negative integer
    /// fails with [`RetriesError::Invalid`] and leaves the current binding untouched.
    pub fn set_max_retries<R>(&self, retries: R) -> Result<(), RetriesError>
    where
        R: TryInto<Retries>,
        RetriesError: From<R::Error>,
    {
        let retries = retries.try_into()?;
        self.bind_retries(retries);
        Ok(())
    }

    /// Snapshot of the bound retry counter, if any.
    pub fn max_retries(&self) -> Option<Retries> {
        *self.retries_slot()
    }

    /// Whether a nonzero exit code fails the run.
    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error.load(AtomicOrdering::Acquire)
    }

    /// Sets the fail-on-nonzero-exit flag.
    pub fn set_fail_on_error(&self, fail_on_error: bool) {
        self.fail_on_error.store(fail_on_error, AtomicOrdering::Release);
    }

    /// True once the runner completed the task through the success path.
    pub fn is_successfully_executed(&self) -> bool {
        self.executed.load(AtomicOrdering::Acquire)
    }

    /// Clears the success flag and rewinds the retry counter.
    ///
    /// Runs are not idempotent; call this before running the same spec again.
    pub fn reset(&self) {
        self.executed.store(false, AtomicOrdering::Release);
        if let Some(retries) = self.retries_slot().as_mut() {
            retries.reset();
        }
    }

    pub(crate) fn mark_as_successfully_executed(&self) {
        self.executed.store(true, AtomicOrdering::Release);
    }

    /// Records one retry. `None` when no counter is bound.
    pub(crate) fn increase_retries(&self) -> Option<Result<u32, RetriesError>> {
        let mut slot = self.retries_slot();
        let retries = slot.as_mut()?;
        Some(retries.increase().map(|()| retries.retries()))
    }

    fn bind_retries(&self, retries: Retries) {
        *self.retries_slot() = Some(retries);
    }

    fn retries_slot(&self) -> MutexGuard<'_, Option<Retries>> {
        self.retries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Payload> fmt::Debug for TaskSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("name", &self.name())
            .field("retries", &self.max_retries())
            .field("fail_on_error", &self.fail_on_error())
            .field("executed", &self.is_successfully_executed())
            .finish()
    }
}
