//! Data models
//!
//! Plain records shared by the engine and its callers. Money is `Decimal`;
//! ids are `i64` except line items, which carry client-generated strings.

pub mod daily_report;
pub mod dining_table;
pub mod employee;
pub mod notification;
pub mod order;
pub mod product;
pub mod register;
pub mod stock;

// Re-exports
pub use daily_report::*;
pub use dining_table::*;
pub use employee::*;
pub use notification::*;
pub use order::*;
pub use product::*;
pub use register::*;
pub use stock::*;
