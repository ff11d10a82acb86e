//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Price type (minor currency units, e.g. FCFA — no fractional part)
pub type Price = i64;
