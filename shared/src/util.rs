use std::sync::atomic::{AtomicU64, Ordering};

/// Get the current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Process-wide sequence for snowflake IDs
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (63 bits):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 22 bits: process-wide sequence (collision-free up to ~4M IDs per ms)
///
/// The sequence component makes IDs unique within a session even when
/// many are generated inside the same millisecond.
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = (SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0x3F_FFFF) as i64; // 22 bits
    (ts << 22) | seq
}

/// Generate a new order identifier ("ORD-" prefix, time-derived)
pub fn order_id() -> String {
    format!("ORD-{}", snowflake_id())
}

/// Generate a new product identifier ("prod-" prefix, time-derived)
pub fn product_id() -> String {
    format!("prod-{}", snowflake_id())
}

/// Tracking code alphabet (base 36, uppercase)
const TRACKING_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Tracking code token length (excluding the "TRK-" prefix)
const TRACKING_TOKEN_LEN: usize = 9;

/// Generate a customer-facing tracking code ("TRK-" + 9 random base-36 chars)
pub fn tracking_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let token: String = (0..TRACKING_TOKEN_LEN)
        .map(|_| TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())] as char)
        .collect();
    format!("TRK-{}", token)
}

/// Format a minor-unit amount for display, e.g. `258 000 FCFA`
pub fn format_price(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 6);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{} FCFA", grouped)
    } else {
        format!("{} FCFA", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_snowflake_ids_unique() {
        let ids: HashSet<i64> = (0..10_000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_order_ids_unique() {
        let ids: HashSet<String> = (0..10_000).map(|_| order_id()).collect();
        assert_eq!(ids.len(), 10_000);
        assert!(ids.iter().all(|id| id.starts_with("ORD-")));
    }

    #[test]
    fn test_tracking_codes_unique() {
        let codes: HashSet<String> = (0..10_000).map(|_| tracking_code()).collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0 FCFA");
        assert_eq!(format_price(500), "500 FCFA");
        assert_eq!(format_price(129_000), "129 000 FCFA");
        assert_eq!(format_price(1_234_567), "1 234 567 FCFA");
        assert_eq!(format_price(-45_000), "-45 000 FCFA");
    }

    #[test]
    fn test_tracking_code_format() {
        let code = tracking_code();
        assert!(code.starts_with("TRK-"));
        assert_eq!(code.len(), 4 + TRACKING_TOKEN_LEN);
        assert!(code[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
