//! Admin inbox - the notification bell feed
//!
//! New-order notifications are persisted by the order engine in the same
//! transaction as the order itself; this module manages the feed (unread
//! counting, read flags, clearing) and runs the delivery worker that
//! forwards live notifications to the admin console. Delivery is gated on
//! the admin-session boolean - the feed is stored either way, so nothing
//! is lost while the admin is logged out.

use crate::error::ShopResult;
use crate::storage::ShopStorage;
use shared::models::AdminNotification;
use shared::ShopEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Delivery channel capacity
const DELIVERY_CHANNEL_CAPACITY: usize = 64;

/// Boolean admin gate consulted before admin-only notification delivery
///
/// Credential checking lives outside the engine; this is only the
/// "is an admin session active" question.
pub trait AdminGate: Send + Sync {
    fn is_admin(&self) -> bool;
}

/// Gate backed by a simple session flag
#[derive(Debug, Default)]
pub struct SessionGate {
    admin: AtomicBool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the login collaborator once credentials checked out
    pub fn grant(&self) {
        self.admin.store(true, Ordering::Relaxed);
    }

    /// Called on logout
    pub fn revoke(&self) {
        self.admin.store(false, Ordering::Relaxed);
    }
}

impl AdminGate for SessionGate {
    fn is_admin(&self) -> bool {
        self.admin.load(Ordering::Relaxed)
    }
}

/// Admin notification feed
#[derive(Clone)]
pub struct AdminInbox {
    storage: ShopStorage,
    gate: Arc<dyn AdminGate>,
}

impl AdminInbox {
    pub fn new(storage: ShopStorage, gate: Arc<dyn AdminGate>) -> Self {
        Self { storage, gate }
    }

    /// Whole feed, oldest first
    pub fn notifications(&self) -> ShopResult<Vec<AdminNotification>> {
        Ok(self.storage.list_notifications()?)
    }

    /// Number of unread notifications (drives the bell badge)
    pub fn unread_count(&self) -> ShopResult<usize> {
        Ok(self
            .storage
            .list_notifications()?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    /// Mark one notification read by its ID
    pub fn mark_read(&self, notification_id: &str) -> ShopResult<()> {
        self.storage.update_notifications(|n| {
            if n.id == notification_id && !n.read {
                n.read = true;
                true
            } else {
                false
            }
        })?;
        Ok(())
    }

    /// Mark every notification pointing at an order as read, and flag the
    /// order itself as seen (called when the admin opens the order detail)
    pub fn mark_order_read(&self, order_id: &str) -> ShopResult<()> {
        self.storage.update_notifications(|n| {
            if n.order_id.as_deref() == Some(order_id) && !n.read {
                n.read = true;
                true
            } else {
                false
            }
        })?;
        if let Some(mut order) = self.storage.get_order(order_id)? {
            if !order.admin_read {
                order.admin_read = true;
                self.storage.put_order(&order)?;
            }
        }
        Ok(())
    }

    /// Mark the whole feed read (opening the bell panel)
    pub fn mark_all_read(&self) -> ShopResult<()> {
        self.storage.update_notifications(|n| {
            if !n.read {
                n.read = true;
                true
            } else {
                false
            }
        })?;
        Ok(())
    }

    /// Drop the whole feed
    pub fn clear(&self) -> ShopResult<()> {
        Ok(self.storage.clear_notifications()?)
    }

    /// Delivery worker
    ///
    /// Subscribes to the change broadcast and forwards new-order
    /// notifications to the admin console channel while the gate allows.
    /// Persistence already happened in the order transaction, so a closed
    /// gate only suppresses the live ping, never the feed entry.
    pub async fn run(
        self,
        mut events: broadcast::Receiver<ShopEvent>,
        delivery_tx: mpsc::Sender<AdminNotification>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("Admin inbox delivery worker started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Admin inbox delivery worker shutting down");
                    break;
                }
                event = events.recv() => match event {
                    Ok(ShopEvent::OrderCreated { order }) => {
                        if !self.gate.is_admin() {
                            tracing::debug!(order_id = %order.id, "No admin session, delivery skipped");
                            continue;
                        }
                        let notification = match self.find_for_order(&order.id) {
                            Ok(Some(notification)) => notification,
                            Ok(None) => {
                                tracing::warn!(order_id = %order.id, "No stored notification for order");
                                continue;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to load notification feed");
                                continue;
                            }
                        };
                        if delivery_tx.send(notification).await.is_err() {
                            tracing::debug!("Delivery receiver dropped, worker stopping");
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Admin inbox lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, admin inbox worker stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Spawn the delivery worker, returning the console channel
    pub fn start(
        &self,
        events: broadcast::Receiver<ShopEvent>,
        shutdown: CancellationToken,
    ) -> mpsc::Receiver<AdminNotification> {
        let (delivery_tx, delivery_rx) = mpsc::channel(DELIVERY_CHANNEL_CAPACITY);
        tokio::spawn(self.clone().run(events, delivery_tx, shutdown));
        delivery_rx
    }

    /// Latest stored notification for an order
    fn find_for_order(&self, order_id: &str) -> ShopResult<Option<AdminNotification>> {
        Ok(self
            .storage
            .list_notifications()?
            .into_iter()
            .rev()
            .find(|n| n.order_id.as_deref() == Some(order_id)))
    }
}
