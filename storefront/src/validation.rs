//! Input validation helpers
//!
//! Centralized text length constants and validation functions, applied
//! when records are constructed from caller payloads.

use crate::error::{ShopError, ShopResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, subcategory
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions (status notes, product descriptions)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, zip codes, sizes, colors
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Image URIs
pub const MAX_URL_LEN: usize = 2048;

/// Shipping addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ShopResult<()> {
    if value.trim().is_empty() {
        return Err(ShopError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(ShopError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> ShopResult<()> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(ShopError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

/// Validate an email address: non-empty, plausible shape, length-bounded.
pub fn validate_email(value: &str) -> ShopResult<()> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| ShopError::validation("email must contain '@'"))?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ShopError::validation(format!("invalid email: {value}")));
    }
    Ok(())
}

/// Validate a cart/order quantity (at least 1).
pub fn validate_quantity(quantity: i32) -> ShopResult<()> {
    if quantity < 1 {
        return Err(ShopError::validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

/// Validate a price amount (non-negative minor units).
pub fn validate_price(price: i64, field: &str) -> ShopResult<()> {
    if price < 0 {
        return Err(ShopError::validation(format!(
            "{field} must not be negative, got {price}"
        )));
    }
    Ok(())
}

/// Validate a stock count (non-negative).
pub fn validate_stock(stock: i32) -> ShopResult<()> {
    if stock < 0 {
        return Err(ShopError::validation(format!(
            "stock must not be negative, got {stock}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Sac en Cuir", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("awa@example.com").is_ok());
        assert!(validate_email("awa").is_err());
        assert!(validate_email("awa@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("awa@example").is_err());
    }

    #[test]
    fn test_quantity_and_amounts() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_price(0, "price").is_ok());
        assert!(validate_price(-1, "price").is_err());
        assert!(validate_stock(-5).is_err());
    }
}
