//! Order engine - order creation, status state machine, audit trails
//!
//! Checkout is atomic from the caller's perspective: the order row, the
//! stock decrements, the cleared cart, the customer index entry, the
//! confirmation record and the admin notification all commit in one write
//! transaction, so no partial effects are ever observable.

use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvents;
use crate::storage::ShopStorage;
use crate::validation::{
    validate_email, validate_optional_text, validate_required_text, MAX_ADDRESS_LEN,
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
};
use shared::models::{
    AdminNotification, CustomerInfo, OrderConfirmation, PaymentMethod, Product, ShippingAddress,
};
use shared::order::{
    Order, OrderItem, OrderStatus, OrderUpdate, OrderUpdateKind, StatusHistoryEntry,
};
use shared::{util, ShopEvent};
use std::collections::BTreeMap;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Order engine
#[derive(Clone)]
pub struct OrderEngine {
    storage: ShopStorage,
    events: ShopEvents,
    delivery_lead_days: i64,
}

impl OrderEngine {
    pub fn new(storage: ShopStorage, events: ShopEvents, delivery_lead_days: i64) -> Self {
        Self {
            storage,
            events,
            delivery_lead_days,
        }
    }

    /// Create an order from the current cart
    ///
    /// Fails with EmptyCart when there is nothing to order, and with
    /// StockChanged when any line no longer fits live stock (the cart
    /// bounded quantities at edit time, but stock may have moved since).
    /// On success the cart is cleared, stock is decremented exactly once
    /// and the customer index, confirmation log and admin feed are updated
    /// atomically with the order itself.
    pub fn create_order(
        &self,
        customer: CustomerInfo,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> ShopResult<Order> {
        validate_required_text(&customer.first_name, "first name", MAX_NAME_LEN)?;
        validate_required_text(&customer.last_name, "last name", MAX_NAME_LEN)?;
        validate_email(&customer.email)?;
        validate_optional_text(Some(&customer.phone), "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&shipping_address.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&shipping_address.city, "city", MAX_NAME_LEN)?;
        validate_required_text(&shipping_address.country, "country", MAX_NAME_LEN)?;

        let lines = self.storage.load_cart()?;
        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        // Re-validate against live stock and snapshot the products; nothing
        // is written until every line fits. Lines sharing a product (size or
        // color variants) decrement the same snapshot cumulatively.
        let mut products: BTreeMap<String, Product> = BTreeMap::new();
        let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
        for line in &lines {
            if !products.contains_key(&line.product_id) {
                let product = self
                    .storage
                    .get_product(&line.product_id)?
                    .ok_or_else(|| ShopError::ProductNotFound(line.product_id.clone()))?;
                products.insert(line.product_id.clone(), product);
            }
            let product = products
                .get_mut(&line.product_id)
                .ok_or_else(|| ShopError::ProductNotFound(line.product_id.clone()))?;
            if !product.has_stock(line.quantity) {
                return Err(ShopError::StockChanged {
                    product_id: product.id.clone(),
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            product.stock -= line.quantity;
            items.push(OrderItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
            });
        }
        let total = items.iter().map(OrderItem::line_total).sum();

        let now = util::now_millis();
        let order = Order {
            id: util::order_id(),
            customer,
            items,
            total,
            status: OrderStatus::Pending,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                note: Some("Commande créée".to_string()),
            }],
            placed_at: now,
            shipping_address,
            payment_method,
            tracking_code: util::tracking_code(),
            estimated_delivery: now + self.delivery_lead_days * MILLIS_PER_DAY,
            updates: Vec::new(),
            admin_read: false,
        };

        let notification = AdminNotification::new(
            "Nouvelle commande",
            format!(
                "Nouvelle commande de {} - {}",
                order.customer.full_name(),
                util::format_price(order.total)
            ),
            Some(order.id.clone()),
        );

        let txn = self.storage.begin_write()?;
        for product in products.values() {
            self.storage.store_product(&txn, product)?;
        }
        self.storage.store_order(&txn, &order)?;
        self.storage.store_cart(&txn, &[])?;
        self.storage
            .index_customer_order(&txn, &order.customer.email, &order.id)?;
        self.storage.append_confirmation(
            &txn,
            &OrderConfirmation {
                order_id: order.id.clone(),
                email: order.customer.email.clone(),
                sent_at: now,
            },
        )?;
        self.storage.append_notification(&txn, &notification)?;
        ShopStorage::commit(txn)?;

        tracing::info!(
            order_id = %order.id,
            tracking_code = %order.tracking_code,
            total = order.total,
            items = order.items.len(),
            "Order created"
        );

        for product in products.values() {
            self.events.emit(ShopEvent::StockChanged {
                product_id: product.id.clone(),
                stock: product.stock,
            });
        }
        self.events.emit(ShopEvent::OrderCreated {
            order: Box::new(order.clone()),
        });

        Ok(order)
    }

    /// Move an order to a new status
    ///
    /// Appends a status-history entry and an update-log entry capturing the
    /// old and new status, then sets `status`. Any status may be set at any
    /// time - the canonical forward sequence in [`OrderStatus::next`] is
    /// advisory and the admin UI is expected to drive forward transitions.
    pub fn update_order_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        note: Option<String>,
    ) -> ShopResult<Order> {
        validate_optional_text(note.as_deref(), "note", MAX_NOTE_LEN)?;
        let mut order = self.order(order_id)?;
        let old_status = order.status;
        let now = util::now_millis();

        order.status_history.push(StatusHistoryEntry {
            status: new_status,
            timestamp: now,
            note: Some(note.clone().unwrap_or_else(|| {
                format!(
                    "Statut changé de \"{}\" à \"{}\"",
                    old_status.label(),
                    new_status.label()
                )
            })),
        });
        order.updates.push(OrderUpdate {
            kind: OrderUpdateKind::StatusChange,
            old_status,
            new_status,
            timestamp: now,
            message: note.unwrap_or_else(|| {
                format!("Votre commande est maintenant \"{}\"", new_status.label())
            }),
        });
        order.status = new_status;

        self.storage.put_order(&order)?;
        tracing::info!(
            order_id = %order.id,
            old_status = %old_status,
            new_status = %new_status,
            "Order status updated"
        );
        self.events.emit(ShopEvent::OrderStatusChanged {
            order_id: order.id.clone(),
            old_status,
            new_status,
        });
        Ok(order)
    }

    /// Advance an order along the canonical forward sequence
    ///
    /// No-op returning the unchanged order when the status is terminal.
    pub fn advance_order(&self, order_id: &str) -> ShopResult<Order> {
        let order = self.order(order_id)?;
        match order.status.next() {
            Some(next) => self.update_order_status(order_id, next, None),
            None => Ok(order),
        }
    }

    /// Look up an order, failing with OrderNotFound
    pub fn order(&self, order_id: &str) -> ShopResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| ShopError::OrderNotFound(order_id.to_string()))
    }

    /// All orders, oldest first
    pub fn orders(&self) -> ShopResult<Vec<Order>> {
        Ok(self.storage.list_orders()?)
    }

    /// Pure lookup by customer-facing tracking code
    pub fn order_by_tracking_code(&self, tracking_code: &str) -> ShopResult<Option<Order>> {
        Ok(self
            .storage
            .list_orders()?
            .into_iter()
            .find(|order| order.tracking_code == tracking_code))
    }

    /// A customer's orders via the secondary index, in placement order
    ///
    /// Index entries whose order was deleted by an admin are skipped.
    pub fn customer_orders(&self, email: &str) -> ShopResult<Vec<Order>> {
        let mut orders = Vec::new();
        for order_id in self.storage.customer_order_ids(email)? {
            if let Some(order) = self.storage.get_order(&order_id)? {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    /// Status history sorted by timestamp (append order breaks ties)
    pub fn status_timeline(&self, order_id: &str) -> ShopResult<Vec<StatusHistoryEntry>> {
        let order = self.order(order_id)?;
        let mut timeline = order.status_history;
        timeline.sort_by_key(|entry| entry.timestamp);
        Ok(timeline)
    }

    /// Explicit admin removal of an order
    ///
    /// The customer index keeps the stale ID; lookups skip it.
    pub fn delete_order(&self, order_id: &str) -> ShopResult<()> {
        self.order(order_id)?;
        self.storage.delete_order(order_id)?;
        tracing::info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    /// Flag an order as seen by the admin console
    pub fn mark_admin_read(&self, order_id: &str) -> ShopResult<()> {
        let mut order = self.order(order_id)?;
        if !order.admin_read {
            order.admin_read = true;
            self.storage.put_order(&order)?;
        }
        Ok(())
    }
}
