//! Real-time event channel.
//!
//! One persistent socket per client instance. A background task owns the
//! connection, sends heartbeats, recovers from failures with backoff, and
//! fans incoming events out to subscribers and the pending-operation
//! correlator.

pub mod correlator;
pub mod manager;
pub mod registry;
pub mod transport;

pub use correlator::{Correlator, PendingOperation};
pub use manager::{EventChannel, Subscription};
pub use registry::{DoshiiEvent, SubscriberId, SubscriptionRegistry};
pub use transport::{MemoryConnector, MemorySession, SocketConnector, SocketTransport, WsConnector};
