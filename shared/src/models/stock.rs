//! Inventory Model

use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stocked ingredient or supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i64,
    pub name: String,
    /// Unit of measure ("kg", "l", "pcs")
    pub unit: String,
    pub quantity: Decimal,
    /// Reorder threshold
    pub min_level: Decimal,
    pub cost_per_unit: Decimal,
}

/// Create stock item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItemCreate {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub min_level: Decimal,
    #[serde(default)]
    pub cost_per_unit: Decimal,
}

/// Recorded stock change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub item_id: i64,
    /// Signed change (positive = restock)
    pub delta: Decimal,
    pub quantity_after: Decimal,
    pub reason: String,
    pub at: Timestamp,
}
