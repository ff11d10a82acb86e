//! Polling reconciliation - eventual delivery of order updates
//!
//! There is no push transport between an admin mutation and an already-open
//! customer session, so a recurring task scans the customer's orders for
//! update-log entries newer than a persisted per-order watermark and
//! surfaces them as notices. Delivery is duplicate-free but batched: every
//! entry since the last tick surfaces together, in chronological order.

use crate::error::ShopResult;
use crate::storage::ShopStorage;
use shared::order::{OrderUpdate, OrderUpdateKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Notice channel capacity
const NOTICE_CHANNEL_CAPACITY: usize = 256;

/// A surfaced order update, ready for presentation
#[derive(Debug, Clone)]
pub struct OrderUpdateNotice {
    pub order_id: String,
    /// Presentation message, e.g. `Mise à jour commande ORD-1: ...`
    pub message: String,
    pub update: OrderUpdate,
}

/// Run one reconciliation step for a customer session
///
/// Collects unseen update-log entries across the customer's orders in
/// chronological order and advances each order's watermark to its latest
/// entry. Running it again with no new entries yields nothing - the step
/// is idempotent, so a restarted session never re-notifies.
pub fn poll_once(storage: &ShopStorage, email: &str) -> ShopResult<Vec<OrderUpdateNotice>> {
    let mut notices = Vec::new();
    for order_id in storage.customer_order_ids(email)? {
        let Some(order) = storage.get_order(&order_id)? else {
            // Deleted by an admin; the stale index entry is harmless
            continue;
        };
        if order.updates.is_empty() {
            continue;
        }

        let watermark = storage.watermark(&order.id)?.unwrap_or(0);
        let unseen: Vec<&OrderUpdate> = order
            .updates
            .iter()
            .filter(|update| update.timestamp > watermark)
            .collect();
        if unseen.is_empty() {
            continue;
        }

        for update in unseen {
            if update.kind == OrderUpdateKind::StatusChange {
                notices.push(OrderUpdateNotice {
                    order_id: order.id.clone(),
                    message: format!("Mise à jour commande {}: {}", order.id, update.message),
                    update: update.clone(),
                });
            }
        }

        // Advance to the latest entry, seen or not, mirroring delivery
        if let Some(latest) = order.latest_update_at() {
            storage.set_watermark(&order.id, latest)?;
        }
    }
    Ok(notices)
}

/// Polling worker for one customer session
///
/// Ticks on a fixed interval, runs [`poll_once`] and forwards the notices
/// over an mpsc channel. Stops when the session's cancellation token fires
/// or the receiving side goes away.
pub struct UpdatePoller {
    storage: ShopStorage,
    email: String,
    interval: Duration,
    shutdown: CancellationToken,
    notice_tx: mpsc::Sender<OrderUpdateNotice>,
}

impl UpdatePoller {
    pub fn new(
        storage: ShopStorage,
        email: impl Into<String>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::Receiver<OrderUpdateNotice>) {
        let (notice_tx, notice_rx) = mpsc::channel(NOTICE_CHANNEL_CAPACITY);
        (
            Self {
                storage,
                email: email.into(),
                interval,
                shutdown,
                notice_tx,
            },
            notice_rx,
        )
    }

    /// Main loop: tick → reconcile → forward notices
    pub async fn run(self) {
        tracing::info!(customer = %self.email, interval = ?self.interval, "Update poller started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a fresh session does
        // not poll before the page settles
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(customer = %self.email, "Update poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match poll_once(&self.storage, &self.email) {
                        Ok(notices) => {
                            for notice in notices {
                                if self.notice_tx.send(notice).await.is_err() {
                                    tracing::debug!("Notice receiver dropped, poller stopping");
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(customer = %self.email, error = %e, "Polling tick failed");
                        }
                    }
                }
            }
        }
    }
}
