//! Domain events and their in-process distribution.
//!
//! The ledger never talks to its caller directly: it emits events, the
//! session wraps them in envelopes and publishes them on a bus.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
