//! Product Model

use crate::types::{Price, Timestamp};
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Category reference (normalized name)
    pub category: String,
    pub subcategory: Option<String>,
    /// Price in minor currency units
    pub price: Price,
    /// Pre-sale price, shown struck through when on sale
    pub original_price: Option<Price>,
    /// Stock count, never negative
    pub stock: i32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    /// Image URIs, first one is the cover
    pub images: Vec<String>,
    pub description: String,
    pub featured: bool,
    pub on_sale: bool,
    pub is_active: bool,
    pub added_at: Timestamp,
}

impl Product {
    /// Whether `quantity` more units can currently be taken from stock
    pub fn has_stock(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Price,
    pub original_price: Option<Price>,
    pub stock: i32,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: Option<Price>,
    pub original_price: Option<Price>,
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
    pub is_active: Option<bool>,
}
