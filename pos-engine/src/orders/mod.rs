//! Orders: the session's order log and the counter screen
//!
//! - [`OrderBook`] - every placed order (table and counter), never deleted
//! - [`CounterBoard`] - counter orders with their own four-step status

mod book;
mod counter;

pub use book::{OrderBook, derive_status};
pub use counter::{CounterBoard, CounterOrder};

use crate::cart::CartError;
use shared::error::{AppError, ErrorCode};
use shared::types::OrderId;
use thiserror::Error;

/// Order errors
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Line {line_id} not found in order {order_id}")]
    LineNotFound { order_id: OrderId, line_id: String },

    #[error("Order {0} is already paid")]
    AlreadyPaid(OrderId),

    #[error("Cannot place an empty order")]
    Empty,

    #[error("Order {0} is already in the log")]
    Duplicate(OrderId),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let code = match &err {
            OrderError::NotFound(_) => ErrorCode::OrderNotFound,
            OrderError::LineNotFound { .. } => ErrorCode::OrderItemNotFound,
            OrderError::AlreadyPaid(_) => ErrorCode::OrderAlreadyPaid,
            OrderError::Empty => ErrorCode::OrderEmpty,
            OrderError::Duplicate(_) => ErrorCode::AlreadyExists,
            OrderError::Cart(cart) => return cart.clone().into(),
        };
        AppError::with_message(code, err.to_string())
    }
}
