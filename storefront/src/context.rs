//! Application context - the single owner of storage, bus and managers
//!
//! Replaces the original's ambient global shop object: everything that
//! wants catalog, cart, orders or notifications goes through a [`Shop`]
//! handle. Cloning is cheap (shared storage handle and bus).

use crate::cart::CartManager;
use crate::catalog::CatalogManager;
use crate::config::ShopConfig;
use crate::error::ShopResult;
use crate::events::ShopEvents;
use crate::notify::{AdminInbox, OrderUpdateNotice, SessionGate, UpdatePoller};
use crate::orders::OrderEngine;
use crate::seed;
use crate::stats::StatsService;
use crate::storage::ShopStorage;
use shared::models::AdminNotification;
use shared::ShopEvent;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// The storefront application context
#[derive(Clone)]
pub struct Shop {
    storage: ShopStorage,
    events: ShopEvents,
    catalog: CatalogManager,
    cart: CartManager,
    orders: OrderEngine,
    inbox: AdminInbox,
    stats: StatsService,
    gate: Arc<SessionGate>,
    config: ShopConfig,
    shutdown: CancellationToken,
}

impl Shop {
    /// Open the shop at the configured database path, seeding the default
    /// catalog on first run
    pub fn open(config: ShopConfig) -> ShopResult<Self> {
        let storage = ShopStorage::open(&config.db_path)?;
        Self::with_storage(storage, config)
    }

    /// In-memory shop (tests and demos)
    pub fn open_in_memory(config: ShopConfig) -> ShopResult<Self> {
        let storage = ShopStorage::open_in_memory()?;
        Self::with_storage(storage, config)
    }

    fn with_storage(storage: ShopStorage, config: ShopConfig) -> ShopResult<Self> {
        seed::seed_if_empty(&storage)?;
        let events = ShopEvents::new();
        let gate = Arc::new(SessionGate::new());
        let shop = Self {
            catalog: CatalogManager::new(
                storage.clone(),
                events.clone(),
                config.low_stock_threshold,
            ),
            cart: CartManager::new(storage.clone()),
            orders: OrderEngine::new(storage.clone(), events.clone(), config.delivery_lead_days),
            inbox: AdminInbox::new(storage.clone(), gate.clone()),
            stats: StatsService::new(storage.clone(), config.low_stock_threshold),
            storage,
            events,
            gate,
            config,
            shutdown: CancellationToken::new(),
        };
        tracing::info!(db = %shop.config.db_path.display(), "Shop context ready");
        Ok(shop)
    }

    // ========== Components ==========

    pub fn catalog(&self) -> &CatalogManager {
        &self.catalog
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub fn orders(&self) -> &OrderEngine {
        &self.orders
    }

    pub fn inbox(&self) -> &AdminInbox {
        &self.inbox
    }

    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    /// The admin-session gate consulted before admin-only delivery
    pub fn admin_gate(&self) -> &Arc<SessionGate> {
        &self.gate
    }

    pub fn storage(&self) -> &ShopStorage {
        &self.storage
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    // ========== Notifications ==========

    /// Subscribe to the typed change broadcast
    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.events.subscribe()
    }

    /// Start the polling worker for a customer session
    ///
    /// The worker stops on [`Shop::shutdown`] or when the receiver drops.
    pub fn start_customer_feed(&self, email: &str) -> mpsc::Receiver<OrderUpdateNotice> {
        let (poller, notices) = UpdatePoller::new(
            self.storage.clone(),
            email,
            self.config.poll_interval,
            self.shutdown.child_token(),
        );
        tokio::spawn(poller.run());
        notices
    }

    /// Start the admin delivery worker (desktop/sound channel)
    pub fn start_admin_feed(&self) -> mpsc::Receiver<AdminNotification> {
        self.inbox
            .start(self.events.subscribe(), self.shutdown.child_token())
    }

    /// Stop all workers started from this context
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdminGate;
    use shared::models::{CustomerInfo, PaymentMethod, ShippingAddress};
    use shared::order::OrderStatus;

    fn create_test_shop() -> Shop {
        Shop::open_in_memory(ShopConfig::default()).unwrap()
    }

    fn checkout(shop: &Shop, email: &str) -> String {
        shop.cart().add_to_cart("prod1", 1, None, None).unwrap();
        shop.orders()
            .create_order(
                CustomerInfo {
                    first_name: "Awa".to_string(),
                    last_name: "Diop".to_string(),
                    email: email.to_string(),
                    phone: String::new(),
                },
                ShippingAddress {
                    address: "12 rue du Marché".to_string(),
                    city: "Douala".to_string(),
                    zip_code: "00237".to_string(),
                    country: "Cameroun".to_string(),
                },
                PaymentMethod::Card,
            )
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_open_seeds_and_wires_components() {
        let shop = create_test_shop();
        assert_eq!(shop.catalog().products().unwrap().len(), 6);
        assert_eq!(shop.catalog().categories().unwrap().len(), 3);
        assert_eq!(shop.stats().dashboard().unwrap().total_products, 6);
        assert!(!shop.admin_gate().is_admin());
    }

    #[tokio::test]
    async fn test_checkout_reaches_subscribers() {
        let shop = create_test_shop();
        let mut rx = shop.subscribe();
        let order_id = checkout(&shop, "awa@example.com");

        // Stock change then order creation, in emit order
        match rx.recv().await.unwrap() {
            ShopEvent::StockChanged { product_id, stock } => {
                assert_eq!(product_id, "prod1");
                assert_eq!(stock, 14);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.recv().await.unwrap() {
            ShopEvent::OrderCreated { order } => assert_eq!(order.id, order_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_feed_end_to_end() {
        let shop = create_test_shop();
        let order_id = checkout(&shop, "awa@example.com");

        let mut feed = shop.start_customer_feed("awa@example.com");
        shop.orders()
            .update_order_status(&order_id, OrderStatus::Confirmed, None)
            .unwrap();

        let notice = feed.recv().await.unwrap();
        assert_eq!(notice.order_id, order_id);
        assert_eq!(notice.update.new_status, OrderStatus::Confirmed);

        shop.shutdown();
    }
}
