//! Browser-local boutique storefront and admin engine
//!
//! Product catalog, cart, order placement, order-status tracking and the
//! admin dashboard aggregates, all persisted in an embedded key-value
//! store with no server backend. The order lifecycle is the core: order
//! creation with at-most-once stock decrement, the status state machine
//! with append-only audit trails, and the notification subsystem that
//! keeps the customer and admin views informed - a typed in-process
//! broadcast plus a polling reconciliation worker standing in for a push
//! channel.
//!
//! All mutations run on a single logical writer; workers are cooperative
//! tokio tasks cancelled through the owning [`Shop`] context.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod notify;
pub mod orders;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod validation;

pub use cart::CartManager;
pub use catalog::CatalogManager;
pub use config::ShopConfig;
pub use context::Shop;
pub use error::{ShopError, ShopResult};
pub use events::ShopEvents;
pub use notify::{AdminGate, AdminInbox, OrderUpdateNotice, SessionGate, UpdatePoller};
pub use orders::OrderEngine;
pub use stats::StatsService;
pub use storage::{ShopStorage, StorageError};
