//! Event publishing/subscription abstraction.
//!
//! A ledger session publishes every applied event so that whoever owns the
//! surrounding application state (a UI, a terminal loop, a test) can react
//! to mutations without holding a second copy of the ledger.
//!
//! Every subscription receives every message published after it was created,
//! in publish order. Nothing is retained for late subscribers.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, TryRecvError};

/// A subscription to an event stream.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// session.add_participant()?;
/// while let Ok(envelope) = subscription.try_recv() {
///     render(envelope.payload());
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything published so far without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Publish/subscribe bus with broadcast semantics.
///
/// `publish()` may fail (e.g. a poisoned lock); the ledger state has already
/// changed by then, so callers log the failure rather than roll back.
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
