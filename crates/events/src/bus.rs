//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **observer pattern** used for change notification: the
//! store publishes after each completed write, and every subscriber gets its own copy.
//!
//! - **Transport-agnostic**: the in-process bus uses channels; nothing here assumes it.
//! - **No persistence**: the bus distributes, the table is the source of truth. A
//!   subscriber that misses a message can always re-read.
//! - **Staleness signal, not data**: consumers treat any message as "cached rows are
//!   stale" and re-fetch, so duplicates are harmless.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to a change stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = store.subscribe();
///
/// // after rendering:
/// if subscription.drain() > 0 {
///     rows = store.read_all()?;
/// }
/// ```
///
/// Subscriptions are designed for single-threaded consumption; a screen owns one.
/// Dropping it unregisters the subscriber on the next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Consume every pending message without blocking and return how many there were.
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

/// Pub/sub abstraction with broadcast semantics.
///
/// ```text
/// write → table (commit) → EventBus::publish → subscribers (list views)
/// ```
///
/// Messages are published only after the write is applied, so a subscriber that
/// re-reads on receipt always observes the change. `publish()` can fail (e.g. a poisoned
/// lock); the write itself is already durable at that point, which is why the store
/// logs publication failures instead of failing the operation.
///
/// The trait requires `Send + Sync`; multiple threads can publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
