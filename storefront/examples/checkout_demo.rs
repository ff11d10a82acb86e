//! Interactive-free demo of the order lifecycle
//!
//! Seeds the default catalog in memory, places an order, walks it to
//! shipped and shows what the customer polling feed and the admin inbox
//! see. Run with `RUST_LOG=storefront=debug` for the full trace.

use shared::models::{CustomerInfo, PaymentMethod, ShippingAddress};
use shared::order::OrderStatus;
use shared::util::format_price;
use std::time::Duration;
use storefront::{Shop, ShopConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Shorter polling than the 5 s default so the demo stays snappy
    let shop = Shop::open_in_memory(ShopConfig {
        poll_interval: Duration::from_secs(1),
        ..ShopConfig::default()
    })?;

    println!("Catalogue:");
    for product in shop.catalog().products()? {
        println!(
            "  {:<28} {:>14}  stock {}",
            product.name,
            format_price(product.price),
            product.stock
        );
    }

    shop.cart().add_to_cart("prod1", 2, None, None)?;
    shop.cart()
        .add_to_cart("prod5", 1, Some("M".to_string()), Some("Rouge".to_string()))?;
    println!("\nPanier: {}", format_price(shop.cart().total()?));

    let order = shop.orders().create_order(
        CustomerInfo {
            first_name: "Awa".to_string(),
            last_name: "Diop".to_string(),
            email: "awa@example.com".to_string(),
            phone: "+237 600 000 000".to_string(),
        },
        ShippingAddress {
            address: "12 rue du Marché".to_string(),
            city: "Douala".to_string(),
            zip_code: "00237".to_string(),
            country: "Cameroun".to_string(),
        },
        PaymentMethod::Card,
    )?;
    println!(
        "\nCommande {} créée, suivi {}, total {}",
        order.id,
        order.tracking_code,
        format_price(order.total)
    );

    // Customer session starts polling, admin logs in
    let mut feed = shop.start_customer_feed("awa@example.com");
    shop.admin_gate().grant();

    shop.orders()
        .update_order_status(&order.id, OrderStatus::Confirmed, None)?;
    shop.orders().update_order_status(
        &order.id,
        OrderStatus::Shipped,
        Some("Expédié par transporteur X".to_string()),
    )?;

    // Both updates arrive batched on the next poll tick (≤ 5 s)
    for _ in 0..2 {
        if let Some(notice) = feed.recv().await {
            println!("Client: {}", notice.message);
        }
    }

    println!(
        "Admin: {} notification(s) non lue(s)",
        shop.inbox().unread_count()?
    );
    for entry in shop.orders().status_timeline(&order.id)? {
        println!(
            "  {:<10} {}",
            entry.status.to_string(),
            entry.note.unwrap_or_default()
        );
    }

    shop.shutdown();
    Ok(())
}
