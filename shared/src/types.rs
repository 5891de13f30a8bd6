//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Product identifier
pub type ProductId = i64;

/// Order identifier
pub type OrderId = i64;

/// Table identifier
pub type TableId = i64;

/// Floor identifier
pub type FloorId = i64;
