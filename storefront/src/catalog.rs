//! Catalog manager - product and category CRUD, stock bookkeeping
//!
//! Stock is a plain non-negative integer. The manager never lets it go
//! negative; cart and order logic check availability before mutating.
//! Orders keep frozen item snapshots, so deleting a product is permitted
//! unconditionally and historical orders survive it.

use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvents;
use crate::storage::ShopStorage;
use crate::validation::{
    validate_optional_text, validate_price, validate_required_text, validate_stock,
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN,
};
use shared::models::{Category, CategoryCreate, Product, ProductCreate, ProductUpdate};
use shared::{util, ShopEvent};
use std::collections::BTreeMap;

/// Catalog manager
#[derive(Clone)]
pub struct CatalogManager {
    storage: ShopStorage,
    events: ShopEvents,
    low_stock_threshold: i32,
}

impl CatalogManager {
    pub fn new(storage: ShopStorage, events: ShopEvents, low_stock_threshold: i32) -> Self {
        Self {
            storage,
            events,
            low_stock_threshold,
        }
    }

    // ========== Products ==========

    /// Create a product from an admin payload
    pub fn add_product(&self, create: ProductCreate) -> ShopResult<Product> {
        validate_required_text(&create.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&create.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(create.subcategory.as_deref(), "subcategory", MAX_NAME_LEN)?;
        validate_price(create.price, "price")?;
        if let Some(original) = create.original_price {
            validate_price(original, "original_price")?;
        }
        validate_stock(create.stock)?;
        for image in &create.images {
            validate_optional_text(Some(image), "image", MAX_URL_LEN)?;
        }
        validate_optional_text(Some(&create.description), "description", MAX_NOTE_LEN)?;

        let product = Product {
            id: util::product_id(),
            name: create.name,
            category: normalize_category(&create.category),
            subcategory: create.subcategory,
            price: create.price,
            original_price: create.original_price,
            stock: create.stock,
            sizes: create.sizes,
            colors: create.colors,
            images: create.images,
            description: create.description,
            featured: create.featured.unwrap_or(false),
            on_sale: create.on_sale.unwrap_or(false),
            is_active: true,
            added_at: util::now_millis(),
        };

        self.storage.put_product(&product)?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product added");
        self.events.emit(ShopEvent::CatalogChanged {
            product_id: product.id.clone(),
        });
        Ok(product)
    }

    /// Apply an update payload to an existing product
    pub fn update_product(&self, product_id: &str, update: ProductUpdate) -> ShopResult<Product> {
        let mut product = self.product(product_id)?;

        let stock_edited = update.stock.is_some();
        if let Some(name) = update.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            product.name = name;
        }
        if let Some(category) = update.category {
            validate_required_text(&category, "category", MAX_NAME_LEN)?;
            product.category = normalize_category(&category);
        }
        if let Some(subcategory) = update.subcategory {
            validate_optional_text(Some(&subcategory), "subcategory", MAX_NAME_LEN)?;
            product.subcategory = Some(subcategory);
        }
        if let Some(price) = update.price {
            validate_price(price, "price")?;
            product.price = price;
        }
        if let Some(original_price) = update.original_price {
            validate_price(original_price, "original_price")?;
            product.original_price = Some(original_price);
        }
        if let Some(stock) = update.stock {
            validate_stock(stock)?;
            product.stock = stock;
        }
        if let Some(sizes) = update.sizes {
            product.sizes = sizes;
        }
        if let Some(colors) = update.colors {
            product.colors = colors;
        }
        if let Some(images) = update.images {
            for image in &images {
                validate_optional_text(Some(image), "image", MAX_URL_LEN)?;
            }
            product.images = images;
        }
        if let Some(description) = update.description {
            validate_optional_text(Some(&description), "description", MAX_NOTE_LEN)?;
            product.description = description;
        }
        if let Some(featured) = update.featured {
            product.featured = featured;
        }
        if let Some(on_sale) = update.on_sale {
            product.on_sale = on_sale;
        }
        if let Some(is_active) = update.is_active {
            product.is_active = is_active;
        }

        self.storage.put_product(&product)?;
        tracing::info!(product_id = %product.id, "Product updated");
        if stock_edited {
            self.events.emit(ShopEvent::StockChanged {
                product_id: product.id.clone(),
                stock: product.stock,
            });
        }
        self.events.emit(ShopEvent::CatalogChanged {
            product_id: product.id.clone(),
        });
        Ok(product)
    }

    /// Delete a product; orders keep their frozen snapshots
    pub fn delete_product(&self, product_id: &str) -> ShopResult<()> {
        // Existence check so the caller gets ProductNotFound, not a no-op
        self.product(product_id)?;
        self.storage.delete_product(product_id)?;
        tracing::info!(product_id = %product_id, "Product deleted");
        self.events.emit(ShopEvent::CatalogChanged {
            product_id: product_id.to_string(),
        });
        Ok(())
    }

    /// Flip a product's active flag
    pub fn toggle_active(&self, product_id: &str) -> ShopResult<Product> {
        let mut product = self.product(product_id)?;
        product.is_active = !product.is_active;
        self.storage.put_product(&product)?;
        tracing::info!(product_id = %product.id, is_active = product.is_active, "Product toggled");
        self.events.emit(ShopEvent::CatalogChanged {
            product_id: product.id.clone(),
        });
        Ok(product)
    }

    /// Look up a product, failing with ProductNotFound
    pub fn product(&self, product_id: &str) -> ShopResult<Product> {
        self.storage
            .get_product(product_id)?
            .ok_or_else(|| ShopError::ProductNotFound(product_id.to_string()))
    }

    /// All products, oldest first
    pub fn products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.storage.list_products()?)
    }

    /// Active products at or below the configured low-stock threshold
    pub fn low_stock_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self
            .storage
            .list_products()?
            .into_iter()
            .filter(|p| p.is_active && p.stock <= self.low_stock_threshold)
            .collect())
    }

    /// Product count per category (active and inactive alike)
    pub fn category_counts(&self) -> ShopResult<BTreeMap<String, usize>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for category in self.storage.list_categories()? {
            counts.insert(category.name, 0);
        }
        for product in self.storage.list_products()? {
            *counts.entry(product.category).or_insert(0) += 1;
        }
        Ok(counts)
    }

    // ========== Categories ==========

    /// Create a category; names are trimmed and lowercased
    pub fn add_category(&self, create: CategoryCreate) -> ShopResult<Category> {
        validate_required_text(&create.name, "category name", MAX_NAME_LEN)?;
        let name = normalize_category(&create.name);
        if self.storage.get_category(&name)?.is_some() {
            return Err(ShopError::DuplicateCategory(name));
        }

        let category = Category {
            name: name.clone(),
            subcategories: create.subcategories,
            image: create.image,
        };
        self.storage.put_category(&category)?;
        tracing::info!(category = %name, "Category added");
        self.events.emit(ShopEvent::CategoryChanged { name });
        Ok(category)
    }

    /// Delete a category
    ///
    /// Fails with CategoryInUse while any product references it; deleting
    /// an unknown category is a no-op.
    pub fn delete_category(&self, name: &str) -> ShopResult<()> {
        let name = normalize_category(name);
        if self.storage.get_category(&name)?.is_none() {
            return Ok(());
        }
        let product_count = self
            .storage
            .list_products()?
            .iter()
            .filter(|p| p.category == name)
            .count();
        if product_count > 0 {
            return Err(ShopError::CategoryInUse {
                name,
                product_count,
            });
        }

        self.storage.remove_category(&name)?;
        tracing::info!(category = %name, "Category deleted");
        self.events.emit(ShopEvent::CategoryChanged { name });
        Ok(())
    }

    /// Append a subcategory to an existing category (de-duplicated)
    pub fn add_subcategory(&self, category: &str, subcategory: &str) -> ShopResult<Category> {
        validate_required_text(subcategory, "subcategory", MAX_NAME_LEN)?;
        let name = normalize_category(category);
        let mut category = self
            .storage
            .get_category(&name)?
            .ok_or_else(|| ShopError::validation(format!("unknown category: {name}")))?;
        let subcategory = subcategory.trim().to_lowercase();
        if !category.subcategories.iter().any(|s| s == &subcategory) {
            category.subcategories.push(subcategory);
            self.storage.put_category(&category)?;
            self.events.emit(ShopEvent::CategoryChanged { name });
        }
        Ok(category)
    }

    /// Remove a subcategory; missing entries are a no-op
    pub fn remove_subcategory(&self, category: &str, subcategory: &str) -> ShopResult<Category> {
        let name = normalize_category(category);
        let mut category = self
            .storage
            .get_category(&name)?
            .ok_or_else(|| ShopError::validation(format!("unknown category: {name}")))?;
        let before = category.subcategories.len();
        category.subcategories.retain(|s| s != subcategory);
        if category.subcategories.len() != before {
            self.storage.put_category(&category)?;
            self.events.emit(ShopEvent::CategoryChanged { name });
        }
        Ok(category)
    }

    /// Set or clear a category's representative image
    pub fn set_category_image(&self, category: &str, image: Option<String>) -> ShopResult<Category> {
        validate_optional_text(image.as_deref(), "image", MAX_URL_LEN)?;
        let name = normalize_category(category);
        let mut category = self
            .storage
            .get_category(&name)?
            .ok_or_else(|| ShopError::validation(format!("unknown category: {name}")))?;
        category.image = image;
        self.storage.put_category(&category)?;
        self.events.emit(ShopEvent::CategoryChanged { name });
        Ok(category)
    }

    /// All categories, sorted by name
    pub fn categories(&self) -> ShopResult<Vec<Category>> {
        Ok(self.storage.list_categories()?)
    }
}

/// Normalize a category name the way the storefront displays them
fn normalize_category(name: &str) -> String {
    name.trim().to_lowercase()
}
