//! Input validation helpers
//!
//! Text length limits shared by the catalog, staff roster and floor plan.
//! Limits are chosen based on:
//! - ESC/POS 80mm ticket line width: 48 chars
//! - Reasonable UX limits for names, notes, descriptions

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: dish, category, floor, stock item, staff member
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (cash movement reason, order note, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, unit of measure
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain`
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    match value.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::validation(format!("'{value}' is not a valid email"))),
    }
}
