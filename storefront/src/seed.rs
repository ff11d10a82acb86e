//! Default catalog seeded on first open
//!
//! A fresh database gets the demo boutique: three categories and six
//! products. Seeding is skipped as soon as any product exists, so admin
//! edits are never overwritten.

use crate::error::ShopResult;
use crate::storage::ShopStorage;
use chrono::NaiveDate;
use shared::models::{Category, Product};
use shared::types::Timestamp;

fn millis(year: i32, month: u32, day: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// The default category tree
pub fn default_categories() -> Vec<Category> {
    vec![
        Category {
            name: "femmes".to_string(),
            subcategories: ["robes", "vestes", "pantalons", "chaussures"]
                .map(String::from)
                .to_vec(),
            image: None,
        },
        Category {
            name: "hommes".to_string(),
            subcategories: ["chemises", "pantalons", "vestes", "chaussures"]
                .map(String::from)
                .to_vec(),
            image: None,
        },
        Category {
            name: "accessoires".to_string(),
            subcategories: ["sacs", "montres", "lunettes", "bijoux"]
                .map(String::from)
                .to_vec(),
            image: None,
        },
    ]
}

/// The default product catalog
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: "prod1".to_string(),
            name: "Sac en Cuir Noir".to_string(),
            category: "accessoires".to_string(),
            subcategory: Some("sacs".to_string()),
            price: 129_000,
            original_price: Some(159_000),
            stock: 15,
            sizes: vec!["Unique".to_string()],
            colors: ["Noir", "Marron"].map(String::from).to_vec(),
            images: vec!["images/sac-cuir-noir.jpg".to_string()],
            description: "Sac en cuir véritable avec finitions impeccables. Parfait pour un usage quotidien.".to_string(),
            featured: true,
            on_sale: true,
            is_active: true,
            added_at: millis(2024, 1, 15),
        },
        Product {
            id: "prod2".to_string(),
            name: "Blazer Femme Élégant".to_string(),
            category: "femmes".to_string(),
            subcategory: Some("vestes".to_string()),
            price: 89_000,
            original_price: Some(89_000),
            stock: 25,
            sizes: ["XS", "S", "M", "L", "XL"].map(String::from).to_vec(),
            colors: ["Beige", "Noir", "Gris"].map(String::from).to_vec(),
            images: vec!["images/blazer-femme.jpg".to_string()],
            description: "Blazer tailleur parfait pour le bureau ou les occasions spéciales.".to_string(),
            featured: true,
            on_sale: false,
            is_active: true,
            added_at: millis(2024, 1, 20),
        },
        Product {
            id: "prod3".to_string(),
            name: "Montre de Luxe".to_string(),
            category: "accessoires".to_string(),
            subcategory: Some("montres".to_string()),
            price: 299_000,
            original_price: Some(350_000),
            stock: 8,
            sizes: vec!["Unique".to_string()],
            colors: ["Or", "Argent"].map(String::from).to_vec(),
            images: vec!["images/montre-luxe.jpg".to_string()],
            description: "Montre suisse avec mouvement automatique et bracelet en cuir.".to_string(),
            featured: false,
            on_sale: true,
            is_active: true,
            added_at: millis(2024, 2, 1),
        },
        Product {
            id: "prod4".to_string(),
            name: "Lunettes de Soleil Design".to_string(),
            category: "accessoires".to_string(),
            subcategory: Some("lunettes".to_string()),
            price: 45_000,
            original_price: Some(45_000),
            stock: 30,
            sizes: vec!["Unique".to_string()],
            colors: ["Noir", "Marron", "Or"].map(String::from).to_vec(),
            images: vec!["images/lunettes-design.jpg".to_string()],
            description: "Lunettes UV400 avec design moderne et protection maximale.".to_string(),
            featured: false,
            on_sale: false,
            is_active: true,
            added_at: millis(2024, 2, 10),
        },
        Product {
            id: "prod5".to_string(),
            name: "Robe Soirée Élégante".to_string(),
            category: "femmes".to_string(),
            subcategory: Some("robes".to_string()),
            price: 185_000,
            original_price: Some(220_000),
            stock: 12,
            sizes: ["XS", "S", "M", "L"].map(String::from).to_vec(),
            colors: ["Noir", "Rouge", "Bleu"].map(String::from).to_vec(),
            images: vec!["images/robe-soiree.jpg".to_string()],
            description: "Robe de soirée en soie avec détails raffinés.".to_string(),
            featured: true,
            on_sale: true,
            is_active: true,
            added_at: millis(2024, 2, 15),
        },
        Product {
            id: "prod6".to_string(),
            name: "Chemise Homme Classique".to_string(),
            category: "hommes".to_string(),
            subcategory: Some("chemises".to_string()),
            price: 65_000,
            original_price: Some(65_000),
            stock: 20,
            sizes: ["S", "M", "L", "XL", "XXL"].map(String::from).to_vec(),
            colors: ["Blanc", "Bleu", "Gris"].map(String::from).to_vec(),
            images: vec!["images/chemise-homme.jpg".to_string()],
            description: "Chemise en coton premium avec coupe ajustée.".to_string(),
            featured: false,
            on_sale: false,
            is_active: true,
            added_at: millis(2024, 2, 20),
        },
    ]
}

/// Seed the default catalog when the product table is empty
///
/// Returns whether anything was written.
pub fn seed_if_empty(storage: &ShopStorage) -> ShopResult<bool> {
    if storage.product_count()? > 0 {
        return Ok(false);
    }

    let txn = storage.begin_write()?;
    for category in default_categories() {
        storage.store_category(&txn, &category)?;
    }
    for product in default_products() {
        storage.store_product(&txn, &product)?;
    }
    ShopStorage::commit(txn)?;
    tracing::info!("Seeded default catalog");
    Ok(true)
}
