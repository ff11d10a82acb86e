//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Names are unique and case-normalized (trimmed, lowercased) on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    /// Representative image URI
    pub image: Option<String>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub image: Option<String>,
}
