//! Cash register: opening float, cash movements, sales and cuts

mod cut;
mod denominations;
mod session;

pub use cut::{CutInput, compute_cut};
pub use denominations::{
    CashCount, DENOMINATION_COUNT, DENOMINATIONS, Denomination, DenominationKind,
};
pub use session::{CashRegister, Sale};

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Register errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegisterError {
    #[error("Register is closed")]
    Closed,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("Cannot take out {requested}, drawer holds {available}")]
    InsufficientCash {
        requested: Decimal,
        available: Decimal,
    },

    #[error("{0}")]
    Invalid(String),
}

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        let code = match &err {
            RegisterError::Closed => ErrorCode::RegisterClosed,
            RegisterError::InvalidAmount => ErrorCode::InvalidAmount,
            RegisterError::InsufficientCash { .. } => ErrorCode::InsufficientCash,
            RegisterError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<AppError> for RegisterError {
    fn from(err: AppError) -> Self {
        RegisterError::Invalid(err.message)
    }
}
