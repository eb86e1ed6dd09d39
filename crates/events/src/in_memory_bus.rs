//! In-process broadcast bus backing a single editing session.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryBusError {
    #[error("event bus lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct Fanout<M> {
    senders: Vec<mpsc::Sender<M>>,
    delivered: u64,
}

/// Synchronous fan-out over `std::sync::mpsc`.
///
/// Dropped subscriptions are pruned on the next publish.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    fanout: Mutex<Fanout<M>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered senders, dead ones included until the next publish.
    pub fn subscriber_count(&self) -> usize {
        self.fanout.lock().map(|f| f.senders.len()).unwrap_or(0)
    }

    /// Messages handed to at least one live subscriber so far.
    pub fn delivered_count(&self) -> u64 {
        self.fanout.lock().map(|f| f.delivered).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            fanout: Mutex::new(Fanout {
                senders: Vec::new(),
                delivered: 0,
            }),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut fanout = self.fanout.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        fanout.senders.retain(|tx| tx.send(message.clone()).is_ok());
        if !fanout.senders.is_empty() {
            fanout.delivered += 1;
        }
        tracing::trace!(subscribers = fanout.senders.len(), "event fanned out");

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // Poisoned: the subscription is still returned but stays silent.
        if let Ok(mut fanout) = self.fanout.lock() {
            fanout.senders.push(tx);
        }

        Subscription::new(rx)
    }
}
