//! Order types: the status state machine, the append-only audit trails
//! and the order record itself.

mod types;

pub use types::{
    Order, OrderItem, OrderStatus, OrderUpdate, OrderUpdateKind, StatusHistoryEntry,
};
