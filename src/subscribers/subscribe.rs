//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into a
//! runner. Each subscriber is awaited in-line by the
//! [`Dispatcher`](crate::Dispatcher) for every event it is registered for.
//!
//! ## Contract
//! - Handlers run **between** task hooks: a slow handler delays the run.
//! - A panicking handler is caught and logged; it does not affect the run.
//! - Handlers get a borrowed [`Event`]; clone what must outlive the call.
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use taskchain::{Event, EventKind, JsonPayload, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe<JsonPayload> for Audit {
//!     async fn on_event(&self, ev: &Event<'_, JsonPayload>) {
//!         if ev.kind == EventKind::TaskFailure {
//!             // write audit record...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;
use crate::payload::Payload;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe<P: Payload>: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event<'_, P>);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
