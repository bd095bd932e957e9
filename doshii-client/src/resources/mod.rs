//! REST resource clients.
//!
//! Thin pass-through builders over [`HttpClient`](crate::http::HttpClient).
//! The order client is the exception: it also talks to the event channel to
//! correlate order creation with its asynchronous confirmation event.

pub mod booking;
pub mod checkin;
pub mod device;
pub mod employee;
pub mod location;
pub mod loyalty;
pub mod menu;
pub mod order;
pub mod referral;
pub mod table;
pub mod transaction;
pub mod webhook;

pub use booking::BookingClient;
pub use checkin::CheckinClient;
pub use device::DeviceClient;
pub use employee::EmployeeClient;
pub use location::LocationClient;
pub use loyalty::LoyaltyClient;
pub use menu::MenuClient;
pub use order::OrderClient;
pub use referral::ReferralClient;
pub use table::TableClient;
pub use transaction::TransactionClient;
pub use webhook::WebhookClient;
