//! # Event subscribers for the taskchain runner.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling events published through the [`Dispatcher`](crate::Dispatcher).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Runner ── publish(&Event) ──► Dispatcher ──► Subscribe::on_event(&Event)
//!                                                     │
//!                                        ┌────────────┼────────────┐
//!                                        ▼            ▼            ▼
//!                                   LogWriter   FnSubscriber    Custom
//! ```
//!
//! ## Subscriber types
//! - [`FnSubscriber`] wraps a closure (what `Runner::on` registers)
//! - `LogWriter` renders events through `tracing` (feature `logging`)
//! - custom types implementing [`Subscribe`]

mod callback;
#[cfg(feature = "logging")]
mod log;
mod subscribe;

pub use callback::FnSubscriber;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
