//! Order record and its audit trails

use crate::models::{CustomerInfo, PaymentMethod, ShippingAddress};
use crate::types::{Price, Timestamp};
use serde::{Deserialize, Serialize};

/// Order status
///
/// Canonical forward sequence is pending → confirmed → shipped → delivered,
/// with cancelled reachable from any non-terminal status. The engine does
/// not enforce the sequence; [`OrderStatus::next`] is advisory, for UI
/// "advance" actions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Next status in the canonical forward sequence, None for terminal states
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Whether no further transitions are expected from this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Customer-facing label
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "En attente",
            OrderStatus::Confirmed => "Confirmée",
            OrderStatus::Shipped => "Expédiée",
            OrderStatus::Delivered => "Livrée",
            OrderStatus::Cancelled => "Annulée",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Status history entry (append-only audit trail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Update log entry kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderUpdateKind {
    StatusChange,
}

/// Update log entry - drives the polling notification channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(rename = "type")]
    pub kind: OrderUpdateKind,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub timestamp: Timestamp,
    pub message: String,
}

/// Ordered item - snapshot of a cart line at checkout time
///
/// Name and unit price are frozen copies so historical orders stay
/// displayable after the product is edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    /// Unit price at order time, in minor currency units
    pub unit_price: Price,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OrderItem {
    /// Line total (unit price × quantity)
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity as Price
    }
}

/// Order entity
///
/// Created atomically at checkout. Status and both audit trails are only
/// mutated through the order engine's status-transition operation.
///
/// Invariants:
/// - `status` equals the status of the last `status_history` entry
/// - `total` equals the sum of item line totals and never changes after
///   creation, even when catalog prices move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    /// Total in minor currency units, frozen at creation
    pub total: Price,
    pub status: OrderStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    pub placed_at: Timestamp,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Customer-facing lookup token, distinct from `id`
    pub tracking_code: String,
    pub estimated_delivery: Timestamp,
    /// Append-only update log consumed by the polling dispatcher
    #[serde(default)]
    pub updates: Vec<OrderUpdate>,
    /// Cleared once an admin has opened the order
    #[serde(default)]
    pub admin_read: bool,
}

impl Order {
    /// Timestamp of the latest update log entry, if any
    pub fn latest_update_at(&self) -> Option<Timestamp> {
        self.updates.last().map(|u| u.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_sequence() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.next(), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::Shipped.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");
        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_update_entry_tagged_as_status_change() {
        let update = OrderUpdate {
            kind: OrderUpdateKind::StatusChange,
            old_status: OrderStatus::Pending,
            new_status: OrderStatus::Confirmed,
            timestamp: 0,
            message: "Votre commande est maintenant \"Confirmée\"".to_string(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "status_change");
        assert_eq!(value["old_status"], "pending");
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: "prod1".to_string(),
            name: "Sac en Cuir Noir".to_string(),
            unit_price: 129_000,
            quantity: 2,
            size: None,
            color: None,
        };
        assert_eq!(item.line_total(), 258_000);
    }
}
