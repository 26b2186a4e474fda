#![deny(missing_docs)]
//! Fuser relay core library.
//!
//! Transport-agnostic logic for relaying messages from source chats to
//! destination chats and propagating later edits to the forwarded copies.

/// Settings and route file loading.
pub mod config;
/// Edit propagation to previously forwarded copies.
pub mod edit;
/// Relay engine: routing and fan-out of new messages.
pub mod engine;
/// Text normalization for relayed content.
pub mod formatting;
/// Forwarded-message registry.
pub mod registry;
/// Retrying outbound sender.
pub mod sender;
/// Relay service lifecycle.
pub mod service;
/// Outbound transport and inbound handler interfaces.
pub mod transport;
/// Identifiers and relay data model.
pub mod types;

#[cfg(test)]
pub mod testing;

pub use edit::{EditOutcome, EditPropagator};
pub use engine::{RelayEngine, RelayOutcome};
pub use registry::ForwardRegistry;
pub use sender::{RetryPolicy, RetrySender};
pub use service::RelayService;
pub use transport::{EditedMessageHandler, NewMessageHandler, RelayTransport, TransportError};
