//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(&mut P) -> Result<Outcome, TaskError>`
//! so small pipeline steps don't need a dedicated type.
//!
//! The closure has no `unless`/`set_up`/`tear_down` hooks; implement [`Task`]
//! directly when those are needed.
//!
//! ## Example
//! ```rust
//! use taskchain::{JsonPayload, Outcome, TaskError, TaskFn, TaskRef};
//!
//! let t: TaskRef<JsonPayload> = TaskFn::spec("count", |p: &mut JsonPayload| {
//!     p.insert("count", 1);
//!     Ok::<_, TaskError>(Outcome::ok())
//! });
//!
//! assert_eq!(t.name(), "count");
//! ```

use std::borrow::Cow;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::payload::Payload;
use crate::tasks::{
    outcome::Outcome,
    spec::{TaskRef, TaskSpec},
    task::Task,
};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::spec`] when you immediately need a [`TaskRef`].
    pub fn new<P>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        P: Payload,
        F: Fn(&mut P) -> Result<Outcome, TaskError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and wraps it into a shared [`TaskRef`] with default settings.
    pub fn spec<P>(name: impl Into<Cow<'static, str>>, f: F) -> TaskRef<P>
    where
        P: Payload,
        F: Fn(&mut P) -> Result<Outcome, TaskError> + Send + Sync + 'static,
    {
        TaskSpec::new(Self::new(name, f)).into_ref()
    }
}

#[async_trait]
impl<P, F> Task<P> for TaskFn<F>
where
    P: Payload,
    F: Fn(&mut P) -> Result<Outcome, TaskError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, payload: &mut P) -> Result<Outcome, TaskError> {
        (self.f)(payload)
    }
}
