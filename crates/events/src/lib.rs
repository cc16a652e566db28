//! Change events and the pub/sub mechanics used to notify read views.
//!
//! The product store publishes one event per successful write; list views subscribe and
//! re-fetch when something arrives. Nothing here knows about products.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::ChangeEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
