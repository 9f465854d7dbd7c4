//! Runtime events: types and dispatcher.
//!
//! This module groups the event **data model** and the **dispatcher** used to
//! publish runtime events emitted by a [`Runner`](crate::Runner) to subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Dispatcher`] ordered publish/subscribe registry
//!
//! ## Quick reference
//! - **Publisher**: `Runner::run` (run events) and the per-task state machine
//!   in `core::machine` (task events).
//! - **Consumers**: user subscribers registered via `Runner::on`,
//!   `Runner::on_name` or `Runner::subscribe`.

mod dispatcher;
mod event;

pub use dispatcher::Dispatcher;
pub use event::{Event, EventKind};
