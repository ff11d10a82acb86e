//! Engine configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the storefront engine
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Path of the redb database file
    pub db_path: PathBuf,
    /// Interval of the customer update-polling loop
    pub poll_interval: Duration,
    /// Stock level at or below which a product counts as low-stock
    pub low_stock_threshold: i32,
    /// Days added to the order date for the estimated delivery
    pub delivery_lead_days: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("boutique.redb"),
            poll_interval: Duration::from_secs(5),
            low_stock_threshold: 5,
            delivery_lead_days: 3,
        }
    }
}
