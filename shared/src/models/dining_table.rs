//! Dining Table Model

use crate::types::{FloorId, TableId, Timestamp};
use serde::{Deserialize, Serialize};

/// Table status
///
/// Any status may follow any other; the waiter picks it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Reserved,
    Filled,
    Occupied,
}

/// Table shape as drawn in the layout editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Square,
    Round,
    Rectangle,
}

/// Position on the floor canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dining table entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub number: u32,
    pub status: TableStatus,
    pub capacity: u32,
    pub shape: TableShape,
    /// Minutes since the table became occupied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
    pub position: Position,
    pub floor_id: FloorId,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: u32,
    pub capacity: u32,
    #[serde(default)]
    pub shape: TableShape,
    #[serde(default)]
    pub position: Position,
    pub floor_id: FloorId,
}

/// Floor: named grouping of tables ("Main Dining", "Outdoor")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    pub name: String,
}

/// Table reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub table_id: TableId,
    pub customer_name: String,
    pub party_size: u32,
    /// Reserved time (Unix millis)
    pub at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_id: TableId,
    pub customer_name: String,
    pub party_size: u32,
    pub at: Timestamp,
    pub note: Option<String>,
}
