//! Domain errors for the storefront engine
//!
//! All variants are recoverable, user-facing conditions; nothing here is
//! fatal to the process and nothing retries automatically. Storage
//! failures surface as the distinct [`ShopError::Persistence`] kind rather
//! than being swallowed.

use crate::storage::StorageError;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum ShopError {
    /// Requested quantity exceeds current availability
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i32,
        available: i32,
    },

    /// Checkout attempted with no cart lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Stock became insufficient between the cart edit and checkout commit
    #[error("Stock changed for {product_id}: requested {requested}, available {available}")]
    StockChanged {
        product_id: String,
        requested: i32,
        available: i32,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category deletion blocked by referencing products
    #[error("Category \"{name}\" still has {product_count} product(s)")]
    CategoryInUse { name: String, product_count: usize },

    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    /// Record rejected at construction
    #[error("{0}")]
    Validation(String),

    /// Storage layer failure (quota, corruption, I/O)
    #[error("Persistence unavailable: {0}")]
    Persistence(#[from] StorageError),
}

impl ShopError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type for engine operations
pub type ShopResult<T> = Result<T, ShopError>;
