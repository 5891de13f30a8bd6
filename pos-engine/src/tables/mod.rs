//! Floor plan: tables, floors, reservations and the occupied-table timer

mod floor_plan;
mod reservations;
mod ticker;

pub use floor_plan::{CANVAS_HEIGHT, CANVAS_WIDTH, FloorPlan, StatusCounts};
pub use ticker::TableTimerTicker;

use shared::error::{AppError, ErrorCode};
use shared::models::TableStatus;
use shared::types::{FloorId, TableId};
use thiserror::Error;

/// Floor plan errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(TableId),

    #[error("Floor not found: {0}")]
    FloorNotFound(FloorId),

    #[error("Floor {0} still has tables")]
    FloorHasTables(FloorId),

    #[error("Table number {0} is already in use")]
    DuplicateNumber(u32),

    #[error("Party of {party_size} exceeds table capacity {capacity}")]
    CapacityExceeded { party_size: u32, capacity: u32 },

    #[error("Table {number} is {status:?}")]
    Unavailable { number: u32, status: TableStatus },

    #[error("Reservation not found: {0}")]
    ReservationNotFound(i64),

    #[error("{0}")]
    Invalid(String),
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let code = match &err {
            TableError::NotFound(_) => ErrorCode::TableNotFound,
            TableError::FloorNotFound(_) => ErrorCode::FloorNotFound,
            TableError::FloorHasTables(_) => ErrorCode::FloorHasTables,
            TableError::DuplicateNumber(_) => ErrorCode::AlreadyExists,
            TableError::CapacityExceeded { .. } => ErrorCode::TableCapacityExceeded,
            TableError::Unavailable {
                status: TableStatus::Occupied | TableStatus::Filled,
                ..
            } => ErrorCode::TableOccupied,
            TableError::Unavailable { .. } => ErrorCode::TableUnavailable,
            TableError::ReservationNotFound(_) => ErrorCode::ReservationNotFound,
            TableError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<AppError> for TableError {
    fn from(err: AppError) -> Self {
        TableError::Invalid(err.message)
    }
}
