//! # Event dispatcher (publish/subscribe).
//!
//! [`Dispatcher`] routes each published [`Event`] to the subscribers registered
//! for its [`EventKind`] (or for every kind).
//!
//! ## Architecture
//! ```text
//! Runner ── publish(&Event) ──► Dispatcher ──► [sub 1] on_event().await
//!                                          ├─► [sub 2] on_event().await
//!                                          └─► [sub N] on_event().await
//! ```
//!
//! ## Rules
//! - **In-line delivery**: `publish` awaits every matching subscriber before it
//!   returns, so anything a subscriber records is visible as soon as the
//!   runner moves on (including just before a run failure propagates).
//! - **Registration order**: subscribers of the same event run in the order
//!   they were registered.
//! - **Isolation**: a panicking subscriber is caught and logged; the remaining
//!   subscribers and the run continue.
//! - The runner only publishes; it never subscribes to its own events.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error};

use crate::payload::Payload;
use crate::subscribers::Subscribe;

use super::event::{Event, EventKind};

struct Registration<P: Payload> {
    /// `None` matches every kind.
    kind: Option<EventKind>,
    subscriber: Arc<dyn Subscribe<P>>,
}

impl<P: Payload> Registration<P> {
    fn matches(&self, kind: EventKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

/// Ordered subscriber registry with in-line fan-out.
pub struct Dispatcher<P: Payload> {
    registrations: Vec<Registration<P>>,
}

impl<P: Payload> Dispatcher<P> {
    /// Creates a dispatcher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Registers `subscriber` for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Arc<dyn Subscribe<P>>) {
        self.registrations.push(Registration {
            kind: Some(kind),
            subscriber,
        });
    }

    /// Registers `subscriber` for every event kind.
    pub fn subscribe_all(&mut self, subscriber: Arc<dyn Subscribe<P>>) {
        self.registrations.push(Registration {
            kind: None,
            subscriber,
        });
    }

    /// Delivers `event` to every matching subscriber, in registration order.
    pub async fn publish(&self, event: &Event<'_, P>) {
        debug!(
            runner = %event.runner,
            event = event.kind.as_str(),
            seq = event.seq,
            "dispatching event"
        );

        for reg in self.registrations.iter().filter(|r| r.matches(event.kind)) {
            let fut = reg.subscriber.on_event(event);
            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                error!(
                    subscriber = reg.subscriber.name(),
                    event = event.kind.as_str(),
                    "subscriber panicked: {}",
                    panic_message(panic_err.as_ref())
                );
            }
        }
    }

    /// Number of subscribers that would receive an event of `kind`.
    #[must_use]
    pub fn listeners(&self, kind: EventKind) -> usize {
        self.registrations.iter().filter(|r| r.matches(kind)).count()
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }
}

impl<P: Payload> Default for Dispatcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::subscribers::FnSubscriber;
    use crate::JsonPayload;

    fn recorder(
        tag: &'static str,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn Subscribe<JsonPayload>> {
        let log = Arc::clone(log);
        Arc::new(FnSubscriber::new(move |ev: &Event<'_, JsonPayload>| {
            log.lock().unwrap().push(format!("{tag}:{}", ev.kind));
        }))
    }

    #[tokio::test]
    async fn delivers_in_registration_order_and_filters_by_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut d = Dispatcher::new();
        d.subscribe(EventKind::TaskStart, recorder("first", &log));
        d.subscribe_all(recorder("all", &log));
        d.subscribe(EventKind::TaskStart, recorder("second", &log));
        d.subscribe(EventKind::RunStart, recorder("run", &log));

        d.publish(&Event::new(EventKind::TaskStart, "r")).await;

        assert_eq!(
            *log.lock().unwrap(),
            ["first:task.start", "all:task.start", "second:task.start"]
        );
        assert_eq!(d.listeners(EventKind::TaskStart), 3);
        assert_eq!(d.listeners(EventKind::TaskSkip), 1);
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut d: Dispatcher<JsonPayload> = Dispatcher::new();
        d.subscribe_all(Arc::new(FnSubscriber::new(|_: &Event<'_, JsonPayload>| {
            panic!("listener bug")
        })));
        d.subscribe_all(recorder("after", &log));

        d.publish(&Event::new(EventKind::RunSuccess, "r")).await;

        assert_eq!(*log.lock().unwrap(), ["after:run.success"]);
    }
}
