//! Money helpers using rust_decimal for precision
//!
//! All monetary values are `Decimal`. Values are rounded to 2 decimal places
//! (half away from zero) whenever they leave a calculation.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 9999;

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display: `$12.50`, `-$3.00`
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{:.2}", sign, symbol, rounded.abs())
}

/// Parse a user-entered amount. Accepts one optional currency symbol, a
/// minus sign before or after it, and thousands separators (`"$1,250.50"`,
/// `"-$3"`, `"$-3"`). Anything else is rejected.
pub fn parse_money(input: &str) -> Result<Decimal, AppError> {
    let invalid = || {
        AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("'{}' is not a valid amount", input),
        )
    };

    let trimmed = input.trim();
    let (mut negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed),
    };
    let rest = match rest.chars().next() {
        Some(c) if is_currency_symbol(c) => &rest[c.len_utf8()..],
        _ => rest,
    };
    let rest = match rest.strip_prefix('-') {
        Some(r) if !negative => {
            negative = true;
            r
        }
        Some(_) => return Err(invalid()),
        None => rest,
    };

    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid());
    }
    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    let value = Decimal::from_str(&digits).map_err(|_| invalid())?;
    Ok(round_money(if negative { -value } else { value }))
}

fn is_currency_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '+')
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}

/// Validate a price: non-negative and below [`MAX_PRICE`]
pub fn validate_price(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("{} must be non-negative, got {}", field, value),
        ));
    }
    if value > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field, MAX_PRICE, value
            ),
        ));
    }
    Ok(())
}

/// Validate an amount that must be strictly positive (payments, cash in/out)
pub fn validate_positive_amount(value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "amount must be greater than zero",
        ));
    }
    if value > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("amount exceeds maximum allowed ({}), got {}", MAX_PRICE, value),
        ));
    }
    Ok(())
}
