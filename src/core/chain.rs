//! # Chained runners.
//!
//! A [`Chain`] is the flat, ordered set of runners attached to a primary
//! runner. They are notified with the same payload once the primary run has
//! succeeded.
//!
//! ```text
//! primary.run(p) ── ok ──► notify(p) ──► child[0].run(p) ──► child[1].run(p) ...
//!                │
//!                └─ err ─► (chain never runs)
//! ```
//!
//! ## Rules
//! - Membership is by identity (`Arc::ptr_eq`); attaching twice fails,
//!   detaching an unknown runner fails.
//! - Attachment order is notification order.
//! - The topology cannot form a cycle: chains are only edited through
//!   `&mut Runner`, and a runner that is uniquely borrowed cannot be shared
//!   inside any other runner's chain.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{info, warn};

use crate::core::config::ChainPolicy;
use crate::core::runner::Runner;
use crate::error::RunnerError;
use crate::payload::Payload;

pub(crate) struct Chain<P: Payload> {
    runners: Vec<Arc<Runner<P>>>,
}

impl<P: Payload> Chain<P> {
    pub fn new() -> Self {
        Self {
            runners: Vec::new(),
        }
    }

    pub fn attach(&mut self, runner: Arc<Runner<P>>) -> Result<(), RunnerError> {
        if self.contains(&runner) {
            return Err(RunnerError::AlreadyAttached {
                runner: runner.name().to_string(),
            });
        }
        self.runners.push(runner);
        Ok(())
    }

    pub fn detach(&mut self, runner: &Arc<Runner<P>>) -> Result<(), RunnerError> {
        let Some(pos) = self.runners.iter().position(|r| Arc::ptr_eq(r, runner)) else {
            return Err(RunnerError::NotAttached {
                runner: runner.name().to_string(),
            });
        };
        self.runners.remove(pos);
        Ok(())
    }

    pub fn contains(&self, runner: &Arc<Runner<P>>) -> bool {
        self.runners.iter().any(|r| Arc::ptr_eq(r, runner))
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Runs every attached runner with `payload`, in attachment order.
    ///
    /// Boxed because a chained run may notify its own chain.
    pub fn notify<'a>(
        &'a self,
        policy: ChainPolicy,
        payload: &'a mut P,
    ) -> BoxFuture<'a, Result<(), RunnerError>> {
        async move {
            let mut first_err = None;

            for runner in &self.runners {
                info!(runner = runner.name(), "calling attached runner");
                let Err(e) = runner.run(&mut *payload).await else {
                    continue;
                };

                let err = RunnerError::ChainFailed {
                    runner: runner.name().to_string(),
                    source: Box::new(e),
                };
                match policy {
                    ChainPolicy::StopOnFailure => return Err(err),
                    ChainPolicy::RunAll => {
                        warn!(runner = runner.name(), "attached runner failed: {err}");
                        first_err.get_or_insert(err);
                    }
                }
            }

            first_err.map_or(Ok(()), Err)
        }
        .boxed()
    }
}
