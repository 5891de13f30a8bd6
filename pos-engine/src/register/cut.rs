//! Cut arithmetic (corte de caja)

use super::CashCount;
use crate::money::round_money;
use rust_decimal::Decimal;
use shared::models::CutResult;

/// Inputs of a cut
#[derive(Debug, Clone, PartialEq)]
pub struct CutInput {
    /// What the cashier counted
    pub declared: CashCount,
    /// What the drawer should hold
    pub expected_cash: Decimal,
    /// Blind cut: the cashier never sees expected or difference
    pub is_blind: bool,
}

/// Compare the declared count against the expected cash
///
/// `difference = declared − expected` (negative means the drawer is short).
/// Blind cuts leave both `expected_cash` and `difference` out of the result.
pub fn compute_cut(input: &CutInput) -> CutResult {
    let total_amount = round_money(input.declared.total());
    if input.is_blind {
        return CutResult {
            total_amount,
            expected_cash: None,
            difference: None,
            is_blind_cut: true,
        };
    }

    let expected = round_money(input.expected_cash);
    CutResult {
        total_amount,
        expected_cash: Some(expected),
        difference: Some(total_amount - expected),
        is_blind_cut: false,
    }
}
