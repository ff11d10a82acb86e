//! Cart manager - line-item aggregation with size/color variant keys
//!
//! Quantity edits are bounded by live product stock; the cart total is
//! always recomputed from current catalog prices and only freezes at
//! checkout. Cart mutations do not broadcast change events - nothing but
//! the owning session looks at the cart.

use crate::error::{ShopError, ShopResult};
use crate::storage::ShopStorage;
use crate::validation::validate_quantity;
use shared::models::CartLine;
use shared::types::Price;
use shared::util;

/// Cart manager for the current session
#[derive(Clone)]
pub struct CartManager {
    storage: ShopStorage,
}

impl CartManager {
    pub fn new(storage: ShopStorage) -> Self {
        Self { storage }
    }

    /// Add a quantity of a product variant to the cart
    ///
    /// Merges into the existing line when the composite key
    /// (product_id, size, color) already exists. The accumulated quantity
    /// is checked against live stock.
    pub fn add_to_cart(
        &self,
        product_id: &str,
        quantity: i32,
        size: Option<String>,
        color: Option<String>,
    ) -> ShopResult<CartLine> {
        validate_quantity(quantity)?;
        let product = self
            .storage
            .get_product(product_id)?
            .ok_or_else(|| ShopError::ProductNotFound(product_id.to_string()))?;

        let mut lines = self.storage.load_cart()?;
        let existing_quantity = lines
            .iter()
            .find(|line| line.matches(product_id, size.as_deref(), color.as_deref()))
            .map(|line| line.quantity)
            .unwrap_or(0);
        let requested = existing_quantity + quantity;
        if !product.has_stock(requested) {
            return Err(ShopError::InsufficientStock {
                product_id: product_id.to_string(),
                requested,
                available: product.stock,
            });
        }

        let line = match lines
            .iter_mut()
            .find(|line| line.matches(product_id, size.as_deref(), color.as_deref()))
        {
            Some(line) => {
                line.quantity = requested;
                line.clone()
            }
            None => {
                let line = CartLine {
                    product_id: product_id.to_string(),
                    quantity,
                    size,
                    color,
                    added_at: util::now_millis(),
                };
                lines.push(line.clone());
                line
            }
        };

        self.storage.save_cart(&lines)?;
        tracing::debug!(product_id = %product_id, quantity = line.quantity, "Cart line upserted");
        Ok(line)
    }

    /// Remove the line matching the composite key; absent lines are a no-op
    pub fn remove_from_cart(
        &self,
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> ShopResult<()> {
        let mut lines = self.storage.load_cart()?;
        let before = lines.len();
        lines.retain(|line| !line.matches(product_id, size, color));
        if lines.len() != before {
            self.storage.save_cart(&lines)?;
            tracing::debug!(product_id = %product_id, "Cart line removed");
        }
        Ok(())
    }

    /// Overwrite a line's quantity, bounded by live stock
    ///
    /// A quantity of 0 removes the line; an absent line is a no-op.
    pub fn update_quantity(
        &self,
        product_id: &str,
        new_quantity: i32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> ShopResult<()> {
        if new_quantity < 0 {
            return Err(ShopError::validation(format!(
                "quantity must not be negative, got {new_quantity}"
            )));
        }
        if new_quantity == 0 {
            return self.remove_from_cart(product_id, size, color);
        }

        let mut lines = self.storage.load_cart()?;
        let Some(line) = lines
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        else {
            return Ok(());
        };

        let product = self
            .storage
            .get_product(product_id)?
            .ok_or_else(|| ShopError::ProductNotFound(product_id.to_string()))?;
        if !product.has_stock(new_quantity) {
            return Err(ShopError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: new_quantity,
                available: product.stock,
            });
        }

        line.quantity = new_quantity;
        self.storage.save_cart(&lines)?;
        tracing::debug!(product_id = %product_id, quantity = new_quantity, "Cart quantity updated");
        Ok(())
    }

    /// Current cart lines, in insertion order
    pub fn lines(&self) -> ShopResult<Vec<CartLine>> {
        Ok(self.storage.load_cart()?)
    }

    /// Total item count across all lines
    pub fn item_count(&self) -> ShopResult<i32> {
        Ok(self.lines()?.iter().map(|line| line.quantity).sum())
    }

    /// Cart total from live catalog prices; missing products contribute 0
    pub fn total(&self) -> ShopResult<Price> {
        let mut total: Price = 0;
        for line in self.lines()? {
            if let Some(product) = self.storage.get_product(&line.product_id)? {
                total += product.price * line.quantity as Price;
            }
        }
        Ok(total)
    }
}
