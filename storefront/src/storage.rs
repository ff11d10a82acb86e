//! redb-based storage layer - the sole durability mechanism
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `products` | `product_id` | `Product` | Catalog |
//! | `orders` | `order_id` | `Order` | Orders with audit trails |
//! | `cart` | `"lines"` | `Vec<CartLine>` | Current session cart |
//! | `categories` | `name` | `Category` | Categories with subcategories and image |
//! | `customer_orders` | `email` | `Vec<String>` | Customer → order-id index |
//! | `watermarks` | `order_id` | `i64` | Last-seen update timestamp (polling) |
//! | `confirmations` | `sequence` | `OrderConfirmation` | Simulated email log |
//! | `notifications` | `sequence` | `AdminNotification` | Admin bell feed |
//! | `counters` | key | `u64` | Append counters |
//!
//! Values are JSON-serialized records. Multi-table mutations that must be
//! atomic (checkout) run inside a single write transaction; redb commits
//! are durable as soon as `commit()` returns.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::{AdminNotification, CartLine, Category, OrderConfirmation, Product};
use shared::order::Order;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");
const CATEGORIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("categories");
const CUSTOMER_ORDERS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("customer_orders");
const WATERMARKS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("watermarks");
const CONFIRMATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("confirmations");
const NOTIFICATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("notifications");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const CART_KEY: &str = "lines";
const CONFIRMATION_SEQ_KEY: &str = "confirmation_seq";
const NOTIFICATION_SEQ_KEY: &str = "notification_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shop storage backed by redb
#[derive(Clone)]
pub struct ShopStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for ShopStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopStorage").finish()
    }
}

impl ShopStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables so later read transactions never hit a missing table
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(CUSTOMER_ORDERS_TABLE)?;
            let _ = write_txn.open_table(WATERMARKS_TABLE)?;
            let _ = write_txn.open_table(CONFIRMATIONS_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (for multi-table atomic mutations)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit a write transaction
    pub fn commit(txn: WriteTransaction) -> StorageResult<()> {
        txn.commit()?;
        Ok(())
    }

    // ========== Products ==========

    /// Store a product (within a transaction)
    pub fn store_product(&self, txn: &WriteTransaction, product: &Product) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let bytes = serde_json::to_vec(product)?;
        table.insert(product.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Store a product in its own transaction
    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.store_product(&txn, product)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_product(&self, product_id: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a product (within a transaction); missing rows are a no-op
    pub fn remove_product(&self, txn: &WriteTransaction, product_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        table.remove(product_id)?;
        Ok(())
    }

    /// Remove a product in its own transaction
    pub fn delete_product(&self, product_id: &str) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.remove_product(&txn, product_id)?;
        txn.commit()?;
        Ok(())
    }

    /// All products, oldest first
    pub fn list_products(&self) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        let mut products = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            products.push(serde_json::from_slice::<Product>(value.value())?);
        }
        products.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    pub fn product_count(&self) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        Ok(table.len()? as usize)
    }

    // ========== Orders ==========

    /// Store an order (within a transaction)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let bytes = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Store an order in its own transaction
    pub fn put_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.store_order(&txn, order)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Remove an order (within a transaction); missing rows are a no-op
    pub fn remove_order(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    /// Remove an order in its own transaction
    pub fn delete_order(&self, order_id: &str) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.remove_order(&txn, order_id)?;
        txn.commit()?;
        Ok(())
    }

    /// All orders, oldest first by placement time
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            orders.push(serde_json::from_slice::<Order>(value.value())?);
        }
        orders.sort_by(|a, b| a.placed_at.cmp(&b.placed_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    // ========== Cart ==========

    /// Replace the whole cart (within a transaction)
    pub fn store_cart(&self, txn: &WriteTransaction, lines: &[CartLine]) -> StorageResult<()> {
        let mut table = txn.open_table(CART_TABLE)?;
        let bytes = serde_json::to_vec(lines)?;
        table.insert(CART_KEY, bytes.as_slice())?;
        Ok(())
    }

    /// Replace the whole cart in its own transaction
    pub fn save_cart(&self, lines: &[CartLine]) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.store_cart(&txn, lines)?;
        txn.commit()?;
        Ok(())
    }

    pub fn load_cart(&self) -> StorageResult<Vec<CartLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        match table.get(CART_KEY)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(Vec::new()),
        }
    }

    // ========== Categories ==========

    /// Store a category (within a transaction)
    pub fn store_category(&self, txn: &WriteTransaction, category: &Category) -> StorageResult<()> {
        let mut table = txn.open_table(CATEGORIES_TABLE)?;
        let bytes = serde_json::to_vec(category)?;
        table.insert(category.name.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Store a category in its own transaction
    pub fn put_category(&self, category: &Category) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.store_category(&txn, category)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_category(&self, name: &str) -> StorageResult<Option<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;
        match table.get(name)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn remove_category(&self, name: &str) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            table.remove(name)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// All categories, sorted by name (redb key order)
    pub fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;
        let mut categories = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            categories.push(serde_json::from_slice::<Category>(value.value())?);
        }
        Ok(categories)
    }

    // ========== Customer Order Index ==========

    /// Order IDs for a customer, in placement order
    pub fn customer_order_ids(&self, email: &str) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CUSTOMER_ORDERS_TABLE)?;
        match table.get(email)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(Vec::new()),
        }
    }

    /// Append an order ID to a customer's index, de-duplicated
    /// (within a transaction)
    pub fn index_customer_order(
        &self,
        txn: &WriteTransaction,
        email: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CUSTOMER_ORDERS_TABLE)?;
        let mut ids: Vec<String> = match table.get(email)? {
            Some(guard) => serde_json::from_slice(guard.value())?,
            None => Vec::new(),
        };
        if !ids.iter().any(|id| id == order_id) {
            ids.push(order_id.to_string());
            let bytes = serde_json::to_vec(&ids)?;
            table.insert(email, bytes.as_slice())?;
        }
        Ok(())
    }

    // ========== Watermarks (polling last-seen) ==========

    pub fn watermark(&self, order_id: &str) -> StorageResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WATERMARKS_TABLE)?;
        Ok(table.get(order_id)?.map(|guard| guard.value()))
    }

    pub fn set_watermark(&self, order_id: &str, timestamp: i64) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(WATERMARKS_TABLE)?;
            table.insert(order_id, timestamp)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Order Confirmations (simulated email log) ==========

    /// Append a confirmation record (within a transaction)
    pub fn append_confirmation(
        &self,
        txn: &WriteTransaction,
        confirmation: &OrderConfirmation,
    ) -> StorageResult<()> {
        let seq = Self::next_counter(txn, CONFIRMATION_SEQ_KEY)?;
        let mut table = txn.open_table(CONFIRMATIONS_TABLE)?;
        let bytes = serde_json::to_vec(confirmation)?;
        table.insert(seq, bytes.as_slice())?;
        Ok(())
    }

    /// All confirmation records, in append order
    pub fn list_confirmations(&self) -> StorageResult<Vec<OrderConfirmation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIRMATIONS_TABLE)?;
        let mut confirmations = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            confirmations.push(serde_json::from_slice::<OrderConfirmation>(value.value())?);
        }
        Ok(confirmations)
    }

    // ========== Admin Notifications ==========

    /// Append an admin notification (within a transaction)
    pub fn append_notification(
        &self,
        txn: &WriteTransaction,
        notification: &AdminNotification,
    ) -> StorageResult<()> {
        let seq = Self::next_counter(txn, NOTIFICATION_SEQ_KEY)?;
        let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
        let bytes = serde_json::to_vec(notification)?;
        table.insert(seq, bytes.as_slice())?;
        Ok(())
    }

    /// All admin notifications, in append order
    pub fn list_notifications(&self) -> StorageResult<Vec<AdminNotification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;
        let mut notifications = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            notifications.push(serde_json::from_slice::<AdminNotification>(value.value())?);
        }
        Ok(notifications)
    }

    /// Update notifications in place with `apply`; returns how many changed
    pub fn update_notifications<F>(&self, mut apply: F) -> StorageResult<usize>
    where
        F: FnMut(&mut AdminNotification) -> bool,
    {
        let txn = self.begin_write()?;
        let mut changed = 0;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let mut updated = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let mut notification: AdminNotification =
                    serde_json::from_slice(value.value())?;
                if apply(&mut notification) {
                    updated.push((key.value(), serde_json::to_vec(&notification)?));
                }
            }
            for (key, bytes) in updated {
                table.insert(key, bytes.as_slice())?;
                changed += 1;
            }
        }
        txn.commit()?;
        Ok(changed)
    }

    /// Drop the whole notification feed
    pub fn clear_notifications(&self) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let mut keys = Vec::new();
            for entry in table.iter()? {
                let (key, _) = entry?;
                keys.push(key.value());
            }
            for key in keys {
                table.remove(key)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Counters ==========

    /// Increment and return an append counter (within a transaction)
    fn next_counter(txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CustomerInfo, PaymentMethod, ShippingAddress};
    use shared::order::{OrderStatus, StatusHistoryEntry};
    use shared::util::now_millis;

    fn create_test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Sac en Cuir Noir".to_string(),
            category: "accessoires".to_string(),
            subcategory: Some("sacs".to_string()),
            price: 129_000,
            original_price: Some(159_000),
            stock: 15,
            sizes: vec!["Unique".to_string()],
            colors: vec!["Noir".to_string(), "Marron".to_string()],
            images: vec![],
            description: "Sac en cuir véritable".to_string(),
            featured: true,
            on_sale: true,
            is_active: true,
            added_at: now_millis(),
        }
    }

    fn create_test_order(id: &str) -> Order {
        let now = now_millis();
        Order {
            id: id.to_string(),
            customer: CustomerInfo {
                first_name: "Awa".to_string(),
                last_name: "Diop".to_string(),
                email: "awa@example.com".to_string(),
                phone: "+237 600 000 000".to_string(),
            },
            items: vec![],
            total: 0,
            status: OrderStatus::Pending,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                note: Some("Commande créée".to_string()),
            }],
            placed_at: now,
            shipping_address: ShippingAddress {
                address: "12 rue du Marché".to_string(),
                city: "Douala".to_string(),
                zip_code: "00237".to_string(),
                country: "Cameroun".to_string(),
            },
            payment_method: PaymentMethod::Card,
            tracking_code: format!("TRK-{}", id),
            estimated_delivery: now,
            updates: vec![],
            admin_read: false,
        }
    }

    #[test]
    fn test_product_round_trip() {
        let storage = ShopStorage::open_in_memory().unwrap();
        let product = create_test_product("prod-1");

        storage.put_product(&product).unwrap();

        let loaded = storage.get_product("prod-1").unwrap().unwrap();
        assert_eq!(loaded.name, product.name);
        assert_eq!(loaded.price, 129_000);
        assert_eq!(loaded.colors, product.colors);

        assert!(storage.get_product("prod-missing").unwrap().is_none());
    }

    #[test]
    fn test_list_products_ordered_by_added_at() {
        let storage = ShopStorage::open_in_memory().unwrap();
        let mut older = create_test_product("prod-b");
        older.added_at = 100;
        let mut newer = create_test_product("prod-a");
        newer.added_at = 200;

        storage.put_product(&newer).unwrap();
        storage.put_product(&older).unwrap();

        let products = storage.list_products().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "prod-b");
        assert_eq!(products[1].id, "prod-a");
    }

    #[test]
    fn test_order_round_trip() {
        let storage = ShopStorage::open_in_memory().unwrap();
        let order = create_test_order("ORD-1");

        storage.put_order(&order).unwrap();

        let loaded = storage.get_order("ORD-1").unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(loaded.status_history.len(), 1);
        assert_eq!(loaded.customer.email, "awa@example.com");
    }

    #[test]
    fn test_cart_round_trip() {
        let storage = ShopStorage::open_in_memory().unwrap();
        assert!(storage.load_cart().unwrap().is_empty());

        let lines = vec![CartLine {
            product_id: "prod-1".to_string(),
            quantity: 2,
            size: Some("M".to_string()),
            color: None,
            added_at: now_millis(),
        }];
        storage.save_cart(&lines).unwrap();

        let loaded = storage.load_cart().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].quantity, 2);
        assert_eq!(loaded[0].size.as_deref(), Some("M"));

        storage.save_cart(&[]).unwrap();
        assert!(storage.load_cart().unwrap().is_empty());
    }

    #[test]
    fn test_customer_order_index_dedup() {
        let storage = ShopStorage::open_in_memory().unwrap();
        let email = "awa@example.com";

        let txn = storage.begin_write().unwrap();
        storage.index_customer_order(&txn, email, "ORD-1").unwrap();
        storage.index_customer_order(&txn, email, "ORD-2").unwrap();
        storage.index_customer_order(&txn, email, "ORD-1").unwrap();
        txn.commit().unwrap();

        let ids = storage.customer_order_ids(email).unwrap();
        assert_eq!(ids, vec!["ORD-1".to_string(), "ORD-2".to_string()]);

        assert!(storage.customer_order_ids("nobody@example.com").unwrap().is_empty());
    }

    #[test]
    fn test_watermarks() {
        let storage = ShopStorage::open_in_memory().unwrap();
        assert!(storage.watermark("ORD-1").unwrap().is_none());

        storage.set_watermark("ORD-1", 1_000).unwrap();
        assert_eq!(storage.watermark("ORD-1").unwrap(), Some(1_000));

        storage.set_watermark("ORD-1", 2_000).unwrap();
        assert_eq!(storage.watermark("ORD-1").unwrap(), Some(2_000));
    }

    #[test]
    fn test_confirmations_append_order() {
        let storage = ShopStorage::open_in_memory().unwrap();

        for i in 0..3 {
            let txn = storage.begin_write().unwrap();
            storage
                .append_confirmation(
                    &txn,
                    &OrderConfirmation {
                        order_id: format!("ORD-{}", i),
                        email: "awa@example.com".to_string(),
                        sent_at: i,
                    },
                )
                .unwrap();
            txn.commit().unwrap();
        }

        let confirmations = storage.list_confirmations().unwrap();
        assert_eq!(confirmations.len(), 3);
        assert_eq!(confirmations[0].order_id, "ORD-0");
        assert_eq!(confirmations[2].order_id, "ORD-2");
    }

    #[test]
    fn test_notification_feed() {
        let storage = ShopStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .append_notification(
                &txn,
                &AdminNotification::new("Nouvelle commande", "test", Some("ORD-1".to_string())),
            )
            .unwrap();
        storage
            .append_notification(
                &txn,
                &AdminNotification::new("Nouvelle commande", "test", Some("ORD-2".to_string())),
            )
            .unwrap();
        txn.commit().unwrap();

        let notifications = storage.list_notifications().unwrap();
        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(|n| !n.read));

        // Mark only ORD-1 as read
        let changed = storage
            .update_notifications(|n| {
                if n.order_id.as_deref() == Some("ORD-1") && !n.read {
                    n.read = true;
                    true
                } else {
                    false
                }
            })
            .unwrap();
        assert_eq!(changed, 1);

        let unread: Vec<_> = storage
            .list_notifications()
            .unwrap()
            .into_iter()
            .filter(|n| !n.read)
            .collect();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].order_id.as_deref(), Some("ORD-2"));

        storage.clear_notifications().unwrap();
        assert!(storage.list_notifications().unwrap().is_empty());
    }

    #[test]
    fn test_atomic_checkout_shape() {
        // A single transaction touching products, orders, cart and the
        // customer index commits or not as a unit.
        let storage = ShopStorage::open_in_memory().unwrap();
        let mut product = create_test_product("prod-1");
        storage.put_product(&product).unwrap();
        storage
            .save_cart(&[CartLine {
                product_id: "prod-1".to_string(),
                quantity: 2,
                size: None,
                color: None,
                added_at: now_millis(),
            }])
            .unwrap();

        let order = create_test_order("ORD-1");
        let txn = storage.begin_write().unwrap();
        product.stock -= 2;
        storage.store_product(&txn, &product).unwrap();
        storage.store_order(&txn, &order).unwrap();
        storage.store_cart(&txn, &[]).unwrap();
        storage
            .index_customer_order(&txn, &order.customer.email, &order.id)
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_product("prod-1").unwrap().unwrap().stock, 13);
        assert!(storage.get_order("ORD-1").unwrap().is_some());
        assert!(storage.load_cart().unwrap().is_empty());
        assert_eq!(
            storage.customer_order_ids("awa@example.com").unwrap(),
            vec!["ORD-1".to_string()]
        );
    }
}
