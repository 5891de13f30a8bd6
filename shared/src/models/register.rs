//! Cash Register Model (corte de caja)

use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::PaymentMethod;

/// Register state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegisterStatus {
    #[default]
    Open,
    Closed,
}

/// Kind of cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutKind {
    /// Mid-shift snapshot (corte X), register stays open
    Partial,
    /// End-of-day cut (corte Z), closes the register
    Final,
}

/// Direction of a manual cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashMovementKind {
    CashIn,
    CashOut,
}

/// Manual cash movement (deposit into / withdrawal from the drawer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub kind: CashMovementKind,
    pub amount: Decimal,
    pub reason: String,
    pub at: Timestamp,
}

/// Result of the cut arithmetic
///
/// `expected_cash` and `difference` are `None` for blind cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutResult {
    /// Declared cash (weighted sum of the counted denominations)
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_cash: Option<Decimal>,
    /// declared − expected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,
    pub is_blind_cut: bool,
}

/// Sales by payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodBreakdown {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub count: u32,
}

/// Full cut report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutReport {
    pub kind: CutKind,
    pub opened_at: Timestamp,
    pub generated_at: Timestamp,
    pub opening_float: Decimal,
    pub cash_in: Decimal,
    pub cash_out: Decimal,
    pub total_sales: Decimal,
    pub payments: Vec<PaymentMethodBreakdown>,
    pub orders_closed: u32,
    pub orders_open: u32,
    pub result: CutResult,
}
