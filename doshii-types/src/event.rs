//! Event kinds delivered over the real-time channel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named category of asynchronous notification pushed by the platform.
///
/// The wire names are the snake_case strings carried in the first element of
/// an `emit` envelope, e.g. `{"emit":["order_updated", {...}]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderCreated,
    OrderUpdated,
    OrderTerminalUpdated,
    TransactionCreated,
    TransactionUpdated,
    BookingCreated,
    BookingUpdated,
    CheckinCreated,
    CheckinUpdated,
    CheckinDeleted,
    TableCreated,
    TableUpdated,
    TableRemoved,
    TableBulkUpdated,
    MenuUpdated,
    PointsRedemption,
    RewardRedemption,
    CardActivate,
    CardEnquiry,
    LoyaltyCheckinCreated,
    LoyaltyCheckinUpdated,
    LoyaltyCheckinDeleted,
}

impl EventKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrderCreated => "order_created",
            EventKind::OrderUpdated => "order_updated",
            EventKind::OrderTerminalUpdated => "order_terminal_updated",
            EventKind::TransactionCreated => "transaction_created",
            EventKind::TransactionUpdated => "transaction_updated",
            EventKind::BookingCreated => "booking_created",
            EventKind::BookingUpdated => "booking_updated",
            EventKind::CheckinCreated => "checkin_created",
            EventKind::CheckinUpdated => "checkin_updated",
            EventKind::CheckinDeleted => "checkin_deleted",
            EventKind::TableCreated => "table_created",
            EventKind::TableUpdated => "table_updated",
            EventKind::TableRemoved => "table_removed",
            EventKind::TableBulkUpdated => "table_bulk_updated",
            EventKind::MenuUpdated => "menu_updated",
            EventKind::PointsRedemption => "points_redemption",
            EventKind::RewardRedemption => "reward_redemption",
            EventKind::CardActivate => "card_activate",
            EventKind::CardEnquiry => "card_enquiry",
            EventKind::LoyaltyCheckinCreated => "loyalty_checkin_created",
            EventKind::LoyaltyCheckinUpdated => "loyalty_checkin_updated",
            EventKind::LoyaltyCheckinDeleted => "loyalty_checkin_deleted",
        }
    }

    /// Parse a wire name into a kind. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }

    /// Whether events of this kind carry an order payload that can resolve a
    /// pending order-creation operation.
    pub fn is_order_event(&self) -> bool {
        matches!(
            self,
            EventKind::OrderCreated | EventKind::OrderUpdated | EventKind::OrderTerminalUpdated
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_wire_names() {
        for kind in [
            EventKind::OrderCreated,
            EventKind::TableBulkUpdated,
            EventKind::LoyaltyCheckinDeleted,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(EventKind::parse("order_exploded"), None);
        assert_eq!(EventKind::parse(""), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EventKind::OrderUpdated).unwrap();
        assert_eq!(json, "\"order_updated\"");
    }
}
