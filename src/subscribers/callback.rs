//! # Closure-backed subscriber.
//!
//! [`FnSubscriber`] adapts a plain `Fn(&Event)` so listeners can be registered
//! without a dedicated type; [`Runner::on`](crate::Runner::on) uses it.

use async_trait::async_trait;

use crate::events::Event;
use crate::payload::Payload;
use crate::subscribers::Subscribe;

/// Subscriber wrapping a synchronous callback.
pub struct FnSubscriber<F> {
    f: F,
}

impl<F> FnSubscriber<F> {
    /// Wraps `f`.
    pub fn new<P>(f: F) -> Self
    where
        P: Payload,
        F: Fn(&Event<'_, P>) + Send + Sync + 'static,
    {
        Self { f }
    }
}

#[async_trait]
impl<P, F> Subscribe<P> for FnSubscriber<F>
where
    P: Payload,
    F: Fn(&Event<'_, P>) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &Event<'_, P>) {
        (self.f)(event);
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}
