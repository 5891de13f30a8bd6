//! Order line-item aggregator
//!
//! Every place that builds an order (table order, counter order, order tab)
//! goes through [`aggregate_line`]:
//! - a line with the same product AND equal customizations absorbs the added
//!   quantity in place
//! - otherwise a new line is appended with a fresh id, the resolved unit price
//!   and status `Pending`
//!
//! Unit price = base price + Σ extras. Removed ingredients carry no price.
//! A line never holds quantity 0: reducing to zero or below removes it.

mod identity;

pub use identity::{LineIdentity, customizations_equal, same_line};

use crate::money::{self, MAX_QUANTITY};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customizations, LineItem, LineItemStatus, MenuItem};
use shared::types::ProductId;
use shared::util::generate_line_id;
use thiserror::Error;

/// Cart errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("quantity exceeds maximum allowed ({max}), got {got}")]
    QuantityExceeded { max: u32, got: u64 },

    #[error("line not found: {0}")]
    LineNotFound(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let code = match &err {
            CartError::InvalidQuantity | CartError::QuantityExceeded { .. } => {
                ErrorCode::InvalidQuantity
            }
            CartError::LineNotFound(_) => ErrorCode::OrderItemNotFound,
            CartError::InvalidPrice(_) => ErrorCode::ProductInvalidPrice,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// The product being added, as the aggregator sees it
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemRef {
    pub product_id: ProductId,
    pub name: String,
    pub base_price: Decimal,
}

impl MenuItemRef {
    pub fn new(product_id: ProductId, name: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            product_id,
            name: name.into(),
            base_price,
        }
    }
}

impl From<&MenuItem> for MenuItemRef {
    fn from(item: &MenuItem) -> Self {
        Self::new(item.id, item.name.clone(), item.base_price)
    }
}

/// What happened when an item was added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// An equal line absorbed the quantity
    Merged { line_id: String, quantity: u32 },
    /// A new line was appended
    Appended { line_id: String },
}

impl AddOutcome {
    pub fn line_id(&self) -> &str {
        match self {
            Self::Merged { line_id, .. } | Self::Appended { line_id } => line_id,
        }
    }
}

/// What happened when a line's quantity changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated { quantity: u32 },
    Removed,
}

/// Effective unit price: base + Σ extras' price deltas
pub fn unit_price(base_price: Decimal, customizations: Option<&Customizations>) -> Decimal {
    base_price + customizations.map(Customizations::extras_total).unwrap_or(Decimal::ZERO)
}

/// Merge `quantity` of `item` into `lines` or append a new line.
///
/// `eligible` narrows which existing lines may absorb the quantity (order
/// rounds only merge into lines the kitchen has not started).
pub fn aggregate_line(
    lines: &mut Vec<LineItem>,
    identity: LineIdentity,
    item: &MenuItemRef,
    quantity: u32,
    customizations: Option<Customizations>,
    eligible: impl Fn(&LineItem) -> bool,
) -> Result<AddOutcome, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }
    if quantity > MAX_QUANTITY {
        return Err(CartError::QuantityExceeded {
            max: MAX_QUANTITY,
            got: u64::from(quantity),
        });
    }

    if let Some(existing) = lines.iter_mut().find(|line| {
        eligible(line) && same_line(identity, line, item, customizations.as_ref())
    }) {
        let merged = u64::from(existing.quantity) + u64::from(quantity);
        if merged > u64::from(MAX_QUANTITY) {
            return Err(CartError::QuantityExceeded {
                max: MAX_QUANTITY,
                got: merged,
            });
        }
        existing.quantity = merged as u32;
        tracing::info!(
            line_id = %existing.id,
            product = %existing.name,
            quantity = existing.quantity,
            "Item quantity updated"
        );
        return Ok(AddOutcome::Merged {
            line_id: existing.id.clone(),
            quantity: existing.quantity,
        });
    }

    money::validate_price(item.base_price, "base price")
        .map_err(|e| CartError::InvalidPrice(e.message))?;
    let price = unit_price(item.base_price, customizations.as_ref());
    money::validate_price(price, "unit price").map_err(|e| CartError::InvalidPrice(e.message))?;

    let line = LineItem {
        id: generate_line_id(),
        product_id: item.product_id,
        name: item.name.clone(),
        price,
        quantity,
        status: LineItemStatus::Pending,
        customizations,
        note: None,
    };
    let line_id = line.id.clone();
    tracing::info!(
        line_id = %line_id,
        product = %line.name,
        quantity,
        unit_price = %line.price,
        "Item added"
    );
    lines.push(line);

    Ok(AddOutcome::Appended { line_id })
}

/// Cart being built before an order is placed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<LineItem>,
    identity: LineIdentity,
}

impl Cart {
    /// Empty cart keyed by product id
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cart with an explicit identity key
    pub fn with_identity(identity: LineIdentity) -> Self {
        Self {
            lines: Vec::new(),
            identity,
        }
    }

    pub fn identity(&self) -> LineIdentity {
        self.identity
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn into_lines(self) -> Vec<LineItem> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add `quantity` of `item` with the given customizations
    pub fn add_item(
        &mut self,
        item: &MenuItemRef,
        quantity: u32,
        customizations: Option<Customizations>,
    ) -> Result<AddOutcome, CartError> {
        aggregate_line(
            &mut self.lines,
            self.identity,
            item,
            quantity,
            customizations,
            |_| true,
        )
    }

    /// Consuming form of [`Cart::add_item`]: `(cart, item, qty, customizations) -> cart`
    pub fn with_item(
        mut self,
        item: &MenuItemRef,
        quantity: u32,
        customizations: Option<Customizations>,
    ) -> Result<Self, CartError> {
        self.add_item(item, quantity, customizations)?;
        Ok(self)
    }

    /// Set a line's quantity. Zero or below removes the line.
    pub fn set_quantity(
        &mut self,
        line_id: &str,
        quantity: i64,
    ) -> Result<QuantityOutcome, CartError> {
        let idx = self.position(line_id)?;

        if quantity <= 0 {
            let removed = self.lines.remove(idx);
            tracing::info!(line_id = %removed.id, product = %removed.name, "Item removed");
            return Ok(QuantityOutcome::Removed);
        }
        if quantity > i64::from(MAX_QUANTITY) {
            return Err(CartError::QuantityExceeded {
                max: MAX_QUANTITY,
                got: quantity as u64,
            });
        }

        let line = &mut self.lines[idx];
        line.quantity = quantity as u32;
        Ok(QuantityOutcome::Updated {
            quantity: line.quantity,
        })
    }

    /// Change a line's quantity by `delta` (the +/- buttons)
    pub fn change_quantity(
        &mut self,
        line_id: &str,
        delta: i64,
    ) -> Result<QuantityOutcome, CartError> {
        let current = i64::from(self.lines[self.position(line_id)?].quantity);
        self.set_quantity(line_id, current.saturating_add(delta))
    }

    pub fn remove_line(&mut self, line_id: &str) -> Result<LineItem, CartError> {
        let idx = self.position(line_id)?;
        Ok(self.lines.remove(idx))
    }

    /// Attach a kitchen note to a line (empty clears it)
    pub fn set_note(&mut self, line_id: &str, note: &str) -> Result<(), CartError> {
        let idx = self.position(line_id)?;
        let note = note.trim();
        self.lines[idx].note = (!note.is_empty()).then(|| note.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ unit price × quantity
    pub fn total(&self) -> Decimal {
        money::round_money(self.lines.iter().map(LineItem::line_total).sum())
    }

    /// Σ quantities
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    fn position(&self, line_id: &str) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))
    }
}
