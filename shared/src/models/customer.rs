//! Customer Model
//!
//! Customer data is captured as a snapshot at order time; there is no
//! live customer entity.

use serde::{Deserialize, Serialize};

/// Customer info snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Shipping address snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Mobile,
}

impl PaymentMethod {
    /// Customer-facing label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Carte bancaire",
            PaymentMethod::Mobile => "Paiement mobile",
        }
    }
}
