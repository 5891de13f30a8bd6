//! Inventory: stock levels, movements and low-stock alerts

use crate::money::round_money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{StockItem, StockItemCreate, StockMovement};
use shared::util::{now_millis, snowflake_id};
use thiserror::Error;

/// Inventory errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Stock item not found: {0}")]
    NotFound(i64),

    #[error("Not enough {name}: have {available}, need {requested}")]
    Insufficient {
        name: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("{0}")]
    Invalid(String),
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        let code = match &err {
            InventoryError::NotFound(_) => ErrorCode::StockItemNotFound,
            InventoryError::Insufficient { .. } => ErrorCode::StockInsufficient,
            InventoryError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<AppError> for InventoryError {
    fn from(err: AppError) -> Self {
        InventoryError::Invalid(err.message)
    }
}

fn ensure_non_negative(value: Decimal, field: &str) -> Result<(), InventoryError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InventoryError::Invalid(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Stock of the restaurant
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<StockItem>,
    movements: Vec<StockMovement>,
    /// Multiplier on `min_level` for the low-stock check
    low_stock_ratio: Decimal,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Decimal::ONE)
    }
}

impl Inventory {
    pub fn new(low_stock_ratio: Decimal) -> Self {
        Self {
            items: Vec::new(),
            movements: Vec::new(),
            low_stock_ratio,
        }
    }

    pub fn add_item(&mut self, payload: StockItemCreate) -> Result<i64, InventoryError> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
        ensure_non_negative(payload.quantity, "quantity")?;
        ensure_non_negative(payload.min_level, "min_level")?;
        ensure_non_negative(payload.cost_per_unit, "cost_per_unit")?;

        let id = snowflake_id();
        self.items.push(StockItem {
            id,
            name: payload.name.trim().to_string(),
            unit: payload.unit.trim().to_string(),
            quantity: payload.quantity,
            min_level: payload.min_level,
            cost_per_unit: payload.cost_per_unit,
        });
        Ok(id)
    }

    pub fn remove_item(&mut self, id: i64) -> Result<StockItem, InventoryError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::NotFound(id))?;
        Ok(self.items.remove(idx))
    }

    /// Change a stock level by `delta`; the result must stay ≥ 0
    ///
    /// Returns the new quantity.
    pub fn adjust(&mut self, id: i64, delta: Decimal, reason: &str) -> Result<Decimal, InventoryError> {
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(InventoryError::NotFound(id))?;

        let after = item.quantity + delta;
        if after.is_sign_negative() && !after.is_zero() {
            return Err(InventoryError::Insufficient {
                name: item.name.clone(),
                available: item.quantity,
                requested: -delta,
            });
        }
        item.quantity = after;

        let below_min = after <= item.min_level * self.low_stock_ratio;
        tracing::info!(item = %item.name, %delta, quantity = %after, reason, "Stock adjusted");
        if below_min && delta.is_sign_negative() {
            tracing::warn!(item = %item.name, quantity = %after, "Stock is low");
        }

        self.movements.push(StockMovement {
            item_id: id,
            delta,
            quantity_after: after,
            reason: reason.trim().to_string(),
            at: now_millis(),
        });
        Ok(after)
    }

    /// Add received stock
    pub fn restock(&mut self, id: i64, quantity: Decimal) -> Result<Decimal, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::Invalid(
                "restock quantity must be greater than zero".to_string(),
            ));
        }
        self.adjust(id, quantity, "restock")
    }

    /// Take stock out (consumption, waste)
    pub fn consume(&mut self, id: i64, quantity: Decimal, reason: &str) -> Result<Decimal, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::Invalid(
                "quantity must be greater than zero".to_string(),
            ));
        }
        self.adjust(id, -quantity, reason)
    }

    pub fn get(&self, id: i64) -> Option<&StockItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    /// Case-insensitive name search
    pub fn search(&self, query: &str) -> Vec<&StockItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn is_low(&self, item: &StockItem) -> bool {
        item.quantity <= item.min_level * self.low_stock_ratio
    }

    /// Items at or below their (scaled) minimum level
    pub fn low_stock(&self) -> Vec<&StockItem> {
        self.items.iter().filter(|i| self.is_low(i)).collect()
    }

    /// Σ quantity × cost per unit
    pub fn stock_value(&self) -> Decimal {
        round_money(
            self.items
                .iter()
                .map(|i| i.quantity * i.cost_per_unit)
                .sum(),
        )
    }

    /// Movement history, oldest first (all items or one item)
    pub fn movements(&self, item_id: Option<i64>) -> Vec<&StockMovement> {
        self.movements
            .iter()
            .filter(|m| item_id.is_none_or(|id| m.item_id == id))
            .collect()
    }
}
