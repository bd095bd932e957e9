//! Doshii Client - POS integration platform client
//!
//! Typed REST resource clients plus a real-time event channel over a
//! persistent socket, with transparent reconnection and request/event
//! correlation for order creation.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod socket;

pub use client::DoshiiClient;
pub use config::{DoshiiConfig, Environment, ReconnectPolicy};
pub use error::{DoshiiError, DoshiiResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use doshii_types::{EventKind, Order, OrderCreate, OrderStatus, SocketFrame};

// Event channel surface
pub use socket::{DoshiiEvent, EventChannel, SubscriberId, Subscription};
