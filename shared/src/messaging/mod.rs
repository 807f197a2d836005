/// Ledger event definitions and publishers
pub mod event_types;
pub mod publisher;

pub use event_types::*;
pub use publisher::{channel_for_event, EventLog, EventPublisher, NoopPublisher};
