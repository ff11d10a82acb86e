//! Cart Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Cart line item
///
/// Identity key is the composite (product_id, size, color): the same
/// product in a different size or color is a separate line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub added_at: Timestamp,
}

impl CartLine {
    /// Whether this line matches the given composite key
    pub fn matches(&self, product_id: &str, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == product_id
            && self.size.as_deref() == size
            && self.color.as_deref() == color
    }
}
