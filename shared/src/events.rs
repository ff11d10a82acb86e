//! Typed change events broadcast after every successful mutation
//!
//! Presentation layers and the notification workers subscribe to these;
//! the engine never depends on what (if anything) is listening.

use crate::order::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Shop change event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShopEvent {
    /// A product's stock count changed (checkout decrement or admin edit)
    StockChanged { product_id: String, stock: i32 },
    /// A product was created, updated, toggled or deleted
    CatalogChanged { product_id: String },
    /// A category was created, updated or deleted
    CategoryChanged { name: String },
    /// A new order was committed (consumed by the admin inbox)
    OrderCreated { order: Box<Order> },
    /// An order moved to a new status
    OrderStatusChanged {
        order_id: String,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
}
