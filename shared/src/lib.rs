//! Shared types for the boutique storefront engine
//!
//! Data models persisted by the store, the typed change-event enum
//! broadcast after every mutation, and ID/timestamp utilities.

pub mod events;
pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use events::ShopEvent;
pub use order::{Order, OrderStatus};
