//! Notification workers
//!
//! Two complementary channels keep the customer and admin views informed:
//! the in-process broadcast bus ([`crate::events::ShopEvents`]) for
//! components that are live right now, and the polling reconciliation
//! worker for update-log entries a customer session has not seen yet.

mod inbox;
mod poller;

pub use inbox::{AdminGate, AdminInbox, SessionGate};
pub use poller::{poll_once, OrderUpdateNotice, UpdatePoller};
