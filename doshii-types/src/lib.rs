//! Doshii Types - wire and domain types shared across the client
//!
//! Event kinds, socket frame envelopes and the resource models used by the
//! REST clients. Kept free of I/O so it can be reused by tooling.

pub mod event;
pub mod frame;
pub mod order;
pub mod resources;

pub use event::EventKind;
pub use frame::{FrameError, SocketFrame};
pub use order::{Order, OrderCreate, OrderStatus};
pub use resources::{
    Booking, Checkin, Device, Employee, Location, LoyaltyMember, Referral, Table, Transaction,
    Webhook,
};
