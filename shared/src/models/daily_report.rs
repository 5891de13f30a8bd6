//! Sales Report Model

use crate::types::{ProductId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::register::PaymentMethodBreakdown;

/// Units and revenue for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSales {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub revenue: Decimal,
}

/// Revenue bucketed by hour of day (0-23, UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySales {
    pub hour: u32,
    pub order_count: u32,
    pub revenue: Decimal,
}

/// Sales report over a time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Inclusive range start (Unix millis)
    pub from: Timestamp,
    /// Exclusive range end (Unix millis)
    pub to: Timestamp,
    /// Orders created in range
    pub order_count: u32,
    /// Paid orders in range
    pub paid_count: u32,
    pub gross_sales: Decimal,
    pub average_ticket: Decimal,
    pub by_payment_method: Vec<PaymentMethodBreakdown>,
    pub top_items: Vec<ItemSales>,
    pub by_hour: Vec<HourlySales>,
    pub generated_at: Timestamp,
}
