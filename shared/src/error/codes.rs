//! Unified error codes for the POS engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / cash register errors
//! - 6xxx: Product / menu / inventory errors
//! - 7xxx: Table errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for compact serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Order is empty
    OrderEmpty = 4007,
    /// Quantity must be positive
    InvalidQuantity = 4008,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Insufficient payment amount
    PaymentInsufficientAmount = 5002,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Payment was cancelled before completion
    PaymentCancelled = 5006,
    /// Another payment for the same order is still processing
    PaymentInProgress = 5007,
    /// Amount must be greater than zero
    InvalidAmount = 5101,
    /// Cash register is closed
    RegisterClosed = 5102,
    /// Not enough cash in the drawer
    InsufficientCash = 5103,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is unavailable
    ProductUnavailable = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has products
    CategoryHasProducts = 6102,
    /// Required customization not selected
    CustomizationRequired = 6301,
    /// Unknown customization group or option
    CustomizationInvalid = 6302,
    /// Stock item not found
    StockItemNotFound = 6901,
    /// Stock would go negative
    StockInsufficient = 6902,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Table is not available
    TableUnavailable = 7003,
    /// Party does not fit the table
    TableCapacityExceeded = 7004,
    /// Floor not found
    FloorNotFound = 7101,
    /// Floor has tables
    FloorHasTables = 7102,
    /// Reservation not found
    ReservationNotFound = 7201,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff email already exists
    StaffEmailExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidQuantity => "Quantity must be greater than zero",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentInsufficientAmount => "Insufficient payment amount",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentCancelled => "Payment was cancelled",
            ErrorCode::PaymentInProgress => "A payment for this order is already in progress",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",
            ErrorCode::RegisterClosed => "Cash register is closed",
            ErrorCode::InsufficientCash => "Not enough cash in the drawer",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductUnavailable => "Product is unavailable",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CustomizationRequired => "A required customization is not selected",
            ErrorCode::CustomizationInvalid => "Invalid customization",
            ErrorCode::StockItemNotFound => "Stock item not found",
            ErrorCode::StockInsufficient => "Insufficient stock",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableUnavailable => "Table is not available",
            ErrorCode::TableCapacityExceeded => "Party size exceeds table capacity",
            ErrorCode::FloorNotFound => "Floor not found",
            ErrorCode::FloorHasTables => "Floor has associated tables",
            ErrorCode::ReservationNotFound => "Reservation not found",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffEmailExists => "Staff email already exists",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidQuantity),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5006 => Ok(ErrorCode::PaymentCancelled),
            5007 => Ok(ErrorCode::PaymentInProgress),
            5101 => Ok(ErrorCode::InvalidAmount),
            5102 => Ok(ErrorCode::RegisterClosed),
            5103 => Ok(ErrorCode::InsufficientCash),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasProducts),
            6301 => Ok(ErrorCode::CustomizationRequired),
            6302 => Ok(ErrorCode::CustomizationInvalid),
            6901 => Ok(ErrorCode::StockItemNotFound),
            6902 => Ok(ErrorCode::StockInsufficient),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableUnavailable),
            7004 => Ok(ErrorCode::TableCapacityExceeded),
            7101 => Ok(ErrorCode::FloorNotFound),
            7102 => Ok(ErrorCode::FloorHasTables),
            7201 => Ok(ErrorCode::ReservationNotFound),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffEmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidAmount.code(), 5101);
        assert_eq!(ErrorCode::CustomizationRequired.code(), 6301);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::StaffEmailExists.code(), 8002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_error_code_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::OrderEmpty,
            ErrorCode::RegisterClosed,
            ErrorCode::StockInsufficient,
            ErrorCode::ReservationNotFound,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_error_code_invalid() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableOccupied).unwrap();
        assert_eq!(json, "7002");

        let code: ErrorCode = serde_json::from_str("5101").unwrap();
        assert_eq!(code, ErrorCode::InvalidAmount);

        assert!(serde_json::from_str::<ErrorCode>("42").is_err());
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
    }
}
