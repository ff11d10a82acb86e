//! Dashboard and customer statistics
//!
//! Aggregations backing the admin dashboard counters and the customer
//! panel. Customers are derived from order snapshots - there is no
//! standalone customer entity.

use crate::error::ShopResult;
use crate::storage::ShopStorage;
use shared::models::CustomerInfo;
use shared::order::OrderStatus;
use shared::types::{Price, Timestamp};
use shared::util;
use std::collections::BTreeMap;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Dashboard counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: Price,
    pub low_stock_items: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
}

/// Per-customer aggregate derived from order snapshots
#[derive(Debug, Clone)]
pub struct CustomerSummary {
    pub customer: CustomerInfo,
    pub order_count: usize,
    pub total_spent: Price,
    pub last_order_at: Timestamp,
}

impl CustomerSummary {
    pub fn level(&self) -> CustomerLevel {
        CustomerLevel::from_activity(self.total_spent, self.order_count)
    }
}

/// Customer loyalty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerLevel {
    New,
    Regular,
    Premium,
    Vip,
}

impl CustomerLevel {
    /// Tier from lifetime spend and order count
    pub fn from_activity(total_spent: Price, order_count: usize) -> Self {
        if order_count >= 10 || total_spent >= 1_000_000 {
            CustomerLevel::Vip
        } else if order_count >= 5 || total_spent >= 500_000 {
            CustomerLevel::Premium
        } else if order_count >= 2 || total_spent >= 100_000 {
            CustomerLevel::Regular
        } else {
            CustomerLevel::New
        }
    }

    /// Customer-facing label
    pub fn label(&self) -> &'static str {
        match self {
            CustomerLevel::New => "Nouveau",
            CustomerLevel::Regular => "Régulier",
            CustomerLevel::Premium => "Premium",
            CustomerLevel::Vip => "VIP",
        }
    }
}

/// Single-customer aggregate for the account page
#[derive(Debug, Clone)]
pub struct CustomerStats {
    pub total_spent: Price,
    pub total_orders: usize,
    pub average_order: Price,
    pub last_order_id: Option<String>,
}

/// Statistics service
#[derive(Clone)]
pub struct StatsService {
    storage: ShopStorage,
    low_stock_threshold: i32,
}

impl StatsService {
    pub fn new(storage: ShopStorage, low_stock_threshold: i32) -> Self {
        Self {
            storage,
            low_stock_threshold,
        }
    }

    /// Counters for the dashboard header
    pub fn dashboard(&self) -> ShopResult<DashboardStats> {
        let products = self.storage.list_products()?;
        let orders = self.storage.list_orders()?;
        Ok(DashboardStats {
            total_products: products.len(),
            total_orders: orders.len(),
            total_revenue: orders.iter().map(|o| o.total).sum(),
            low_stock_items: products
                .iter()
                .filter(|p| p.is_active && p.stock <= self.low_stock_threshold)
                .count(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            delivered_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .count(),
        })
    }

    /// Customers aggregated from order snapshots, keyed by email
    pub fn unique_customers(&self) -> ShopResult<Vec<CustomerSummary>> {
        let mut by_email: BTreeMap<String, CustomerSummary> = BTreeMap::new();
        for order in self.storage.list_orders()? {
            let entry = by_email
                .entry(order.customer.email.clone())
                .or_insert_with(|| CustomerSummary {
                    customer: order.customer.clone(),
                    order_count: 0,
                    total_spent: 0,
                    last_order_at: order.placed_at,
                });
            entry.order_count += 1;
            entry.total_spent += order.total;
            entry.last_order_at = entry.last_order_at.max(order.placed_at);
        }
        Ok(by_email.into_values().collect())
    }

    /// One customer's aggregate via the order index
    pub fn customer_stats(&self, email: &str) -> ShopResult<CustomerStats> {
        let mut total_spent: Price = 0;
        let mut total_orders = 0;
        let mut last_order_id = None;
        for order_id in self.storage.customer_order_ids(email)? {
            if let Some(order) = self.storage.get_order(&order_id)? {
                total_spent += order.total;
                total_orders += 1;
                last_order_id = Some(order.id);
            }
        }
        Ok(CustomerStats {
            total_spent,
            total_orders,
            average_order: if total_orders > 0 {
                total_spent / total_orders as Price
            } else {
                0
            },
            last_order_id,
        })
    }

    /// Customers who ordered within the last `days` days
    pub fn active_customer_count(&self, days: i64) -> ShopResult<usize> {
        let cutoff = util::now_millis() - days * MILLIS_PER_DAY;
        Ok(self
            .unique_customers()?
            .iter()
            .filter(|c| c.last_order_at > cutoff)
            .count())
    }

    /// Share of customers with more than one order, in whole percent
    pub fn repeat_customer_rate(&self) -> ShopResult<u32> {
        let customers = self.unique_customers()?;
        if customers.is_empty() {
            return Ok(0);
        }
        let repeat = customers.iter().filter(|c| c.order_count > 1).count();
        Ok((repeat * 100 / customers.len()) as u32)
    }

    /// Mean order total across all orders
    pub fn average_order_value(&self) -> ShopResult<Price> {
        let orders = self.storage.list_orders()?;
        if orders.is_empty() {
            return Ok(0);
        }
        let revenue: Price = orders.iter().map(|o| o.total).sum();
        Ok(revenue / orders.len() as Price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PaymentMethod, Product, ShippingAddress};
    use shared::order::{Order, StatusHistoryEntry};

    fn create_test_order(id: &str, email: &str, total: Price, status: OrderStatus) -> Order {
        let now = util::now_millis();
        Order {
            id: id.to_string(),
            customer: CustomerInfo {
                first_name: "Awa".to_string(),
                last_name: "Diop".to_string(),
                email: email.to_string(),
                phone: String::new(),
            },
            items: vec![],
            total,
            status,
            status_history: vec![StatusHistoryEntry {
                status,
                timestamp: now,
                note: None,
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

    fn create_test_product(id: &str, stock: i32, is_active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: "accessoires".to_string(),
            subcategory: None,
            price: 10_000,
            original_price: None,
            stock,
            sizes: vec![],
            colors: vec![],
            images: vec![],
            description: String::new(),
            featured: false,
            on_sale: false,
            is_active,
            added_at: util::now_millis(),
        }
    }

    fn seed_storage() -> (StatsService, ShopStorage) {
        let storage = ShopStorage::open_in_memory().unwrap();
        (StatsService::new(storage.clone(), 5), storage)
    }

    #[test]
    fn test_dashboard_counters() {
        let (stats, storage) = seed_storage();
        storage.put_product(&create_test_product("prod1", 3, true)).unwrap();
        storage.put_product(&create_test_product("prod2", 30, true)).unwrap();
        storage.put_product(&create_test_product("prod3", 2, false)).unwrap();

        storage
            .put_order(&create_test_order("ORD-1", "a@example.com", 100_000, OrderStatus::Pending))
            .unwrap();
        storage
            .put_order(&create_test_order("ORD-2", "a@example.com", 50_000, OrderStatus::Delivered))
            .unwrap();
        storage
            .put_order(&create_test_order("ORD-3", "b@example.com", 75_000, OrderStatus::Shipped))
            .unwrap();

        let dashboard = stats.dashboard().unwrap();
        assert_eq!(dashboard.total_products, 3);
        assert_eq!(dashboard.total_orders, 3);
        assert_eq!(dashboard.total_revenue, 225_000);
        // Inactive low-stock product does not count
        assert_eq!(dashboard.low_stock_items, 1);
        assert_eq!(dashboard.pending_orders, 1);
        assert_eq!(dashboard.delivered_orders, 1);
    }

    #[test]
    fn test_unique_customers_and_rates() {
        let (stats, storage) = seed_storage();
        storage
            .put_order(&create_test_order("ORD-1", "a@example.com", 100_000, OrderStatus::Pending))
            .unwrap();
        storage
            .put_order(&create_test_order("ORD-2", "a@example.com", 60_000, OrderStatus::Pending))
            .unwrap();
        storage
            .put_order(&create_test_order("ORD-3", "b@example.com", 40_000, OrderStatus::Pending))
            .unwrap();

        let customers = stats.unique_customers().unwrap();
        assert_eq!(customers.len(), 2);
        let a = customers
            .iter()
            .find(|c| c.customer.email == "a@example.com")
            .unwrap();
        assert_eq!(a.order_count, 2);
        assert_eq!(a.total_spent, 160_000);
        assert_eq!(a.level(), CustomerLevel::Regular);

        assert_eq!(stats.repeat_customer_rate().unwrap(), 50);
        assert_eq!(stats.average_order_value().unwrap(), 66_666);
        assert_eq!(stats.active_customer_count(30).unwrap(), 2);
    }

    #[test]
    fn test_customer_stats_via_index() {
        let (stats, storage) = seed_storage();
        let order = create_test_order("ORD-1", "a@example.com", 120_000, OrderStatus::Pending);
        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order).unwrap();
        storage
            .index_customer_order(&txn, "a@example.com", "ORD-1")
            .unwrap();
        txn.commit().unwrap();

        let customer = stats.customer_stats("a@example.com").unwrap();
        assert_eq!(customer.total_orders, 1);
        assert_eq!(customer.total_spent, 120_000);
        assert_eq!(customer.average_order, 120_000);
        assert_eq!(customer.last_order_id.as_deref(), Some("ORD-1"));

        let nobody = stats.customer_stats("nobody@example.com").unwrap();
        assert_eq!(nobody.total_orders, 0);
        assert_eq!(nobody.average_order, 0);
        assert!(nobody.last_order_id.is_none());
    }

    #[test]
    fn test_customer_levels() {
        assert_eq!(CustomerLevel::from_activity(0, 1), CustomerLevel::New);
        assert_eq!(CustomerLevel::from_activity(0, 2), CustomerLevel::Regular);
        assert_eq!(
            CustomerLevel::from_activity(100_000, 1),
            CustomerLevel::Regular
        );
        assert_eq!(
            CustomerLevel::from_activity(500_000, 1),
            CustomerLevel::Premium
        );
        assert_eq!(CustomerLevel::from_activity(0, 5), CustomerLevel::Premium);
        assert_eq!(CustomerLevel::from_activity(1_000_000, 1), CustomerLevel::Vip);
        assert_eq!(CustomerLevel::from_activity(0, 10), CustomerLevel::Vip);
        assert_eq!(CustomerLevel::Vip.label(), "VIP");
    }
}
