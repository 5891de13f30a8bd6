use super::TableError;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use serde::{Deserialize, Serialize};
use shared::models::{Floor, Position, Reservation, Table, TableCreate, TableStatus};
use shared::types::{FloorId, TableId};
use shared::util::snowflake_id;

/// Layout editor canvas width (px)
pub const CANVAS_WIDTH: i32 = 800;
/// Layout editor canvas height (px)
pub const CANVAS_HEIGHT: i32 = 600;

/// Number of tables in each status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub available: usize,
    pub reserved: usize,
    pub filled: usize,
    pub occupied: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.available + self.reserved + self.filled + self.occupied
    }
}

/// Tables and floors of the restaurant
///
/// Status transitions are free: the waiter picks any status for any table.
/// The only side effects are on the timer (see [`FloorPlan::set_status`]).
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    pub(super) floors: Vec<Floor>,
    pub(super) tables: Vec<Table>,
    pub(super) reservations: Vec<Reservation>,
}

impl FloorPlan {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Floors ==========

    pub fn add_floor(&mut self, name: &str) -> Result<FloorId, TableError> {
        validate_required_text(name, "floor name", MAX_NAME_LEN)?;
        let id = snowflake_id();
        self.floors.push(Floor {
            id,
            name: name.trim().to_string(),
        });
        Ok(id)
    }

    /// Remove a floor; rejected while any table is still on it
    pub fn remove_floor(&mut self, floor_id: FloorId) -> Result<Floor, TableError> {
        let idx = self
            .floors
            .iter()
            .position(|f| f.id == floor_id)
            .ok_or(TableError::FloorNotFound(floor_id))?;
        if self.tables.iter().any(|t| t.floor_id == floor_id) {
            return Err(TableError::FloorHasTables(floor_id));
        }
        Ok(self.floors.remove(idx))
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, floor_id: FloorId) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == floor_id)
    }

    // ========== Tables ==========

    pub fn add_table(&mut self, payload: TableCreate) -> Result<TableId, TableError> {
        if self.floor(payload.floor_id).is_none() {
            return Err(TableError::FloorNotFound(payload.floor_id));
        }
        if payload.capacity == 0 {
            return Err(TableError::Invalid(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.table_by_number(payload.number).is_some() {
            return Err(TableError::DuplicateNumber(payload.number));
        }

        let id = snowflake_id();
        self.tables.push(Table {
            id,
            number: payload.number,
            status: TableStatus::Available,
            capacity: payload.capacity,
            shape: payload.shape,
            timer: None,
            position: clamp_to_canvas(payload.position),
            floor_id: payload.floor_id,
        });
        tracing::debug!(table_id = id, number = payload.number, "Table added");
        Ok(id)
    }

    /// Remove a table from the layout; a seated table cannot be removed
    pub fn remove_table(&mut self, table_id: TableId) -> Result<Table, TableError> {
        let idx = self
            .tables
            .iter()
            .position(|t| t.id == table_id)
            .ok_or(TableError::NotFound(table_id))?;
        let table = &self.tables[idx];
        if matches!(table.status, TableStatus::Occupied | TableStatus::Filled) {
            return Err(TableError::Unavailable {
                number: table.number,
                status: table.status,
            });
        }
        self.reservations.retain(|r| r.table_id != table_id);
        Ok(self.tables.remove(idx))
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, table_id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn table_by_number(&self, number: u32) -> Option<&Table> {
        self.tables.iter().find(|t| t.number == number)
    }

    pub fn tables_on_floor(&self, floor_id: FloorId) -> Vec<&Table> {
        self.tables.iter().filter(|t| t.floor_id == floor_id).collect()
    }

    /// Set a table's status
    ///
    /// Any status may follow any other. Entering `Occupied` resets the timer
    /// to 0, entering `Available` clears it, other statuses keep it.
    /// Returns the previous status.
    pub fn set_status(
        &mut self,
        table_id: TableId,
        status: TableStatus,
    ) -> Result<TableStatus, TableError> {
        let table = self.table_mut(table_id)?;
        let previous = table.status;
        table.status = status;
        match status {
            TableStatus::Occupied => table.timer = Some(0),
            TableStatus::Available => table.timer = None,
            TableStatus::Reserved | TableStatus::Filled => {}
        }
        tracing::info!(
            table_id,
            number = table.number,
            from = ?previous,
            to = ?status,
            "Table status changed"
        );
        Ok(previous)
    }

    /// Advance the timer of every occupied table by one minute
    ///
    /// Returns the number of tables ticked.
    pub fn tick(&mut self) -> usize {
        let mut ticked = 0;
        for table in self
            .tables
            .iter_mut()
            .filter(|t| t.status == TableStatus::Occupied)
        {
            table.timer = Some(table.timer.unwrap_or(0).saturating_add(1));
            ticked += 1;
        }
        ticked
    }

    /// Drag a table in the layout editor; the position is clamped to the canvas
    pub fn move_table(
        &mut self,
        table_id: TableId,
        position: Position,
    ) -> Result<Position, TableError> {
        let table = self.table_mut(table_id)?;
        table.position = clamp_to_canvas(position);
        Ok(table.position)
    }

    /// Move a table to another floor
    pub fn assign_floor(&mut self, table_id: TableId, floor_id: FloorId) -> Result<(), TableError> {
        if self.floor(floor_id).is_none() {
            return Err(TableError::FloorNotFound(floor_id));
        }
        self.table_mut(table_id)?.floor_id = floor_id;
        Ok(())
    }

    /// Status counts, for one floor or the whole restaurant
    pub fn status_counts(&self, floor_id: Option<FloorId>) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for table in self
            .tables
            .iter()
            .filter(|t| floor_id.is_none_or(|f| t.floor_id == f))
        {
            match table.status {
                TableStatus::Available => counts.available += 1,
                TableStatus::Reserved => counts.reserved += 1,
                TableStatus::Filled => counts.filled += 1,
                TableStatus::Occupied => counts.occupied += 1,
            }
        }
        counts
    }

    pub(super) fn table_mut(&mut self, table_id: TableId) -> Result<&mut Table, TableError> {
        self.tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or(TableError::NotFound(table_id))
    }
}

fn clamp_to_canvas(position: Position) -> Position {
    Position::new(
        position.x.clamp(0, CANVAS_WIDTH),
        position.y.clamp(0, CANVAS_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TableShape;

    fn plan_with_table() -> (FloorPlan, FloorId, TableId) {
        let mut plan = FloorPlan::new();
        let floor = plan.add_floor("Main Dining").unwrap();
        let table = plan
            .add_table(TableCreate {
                number: 1,
                capacity: 4,
                shape: TableShape::Round,
                position: Position::new(10, 20),
                floor_id: floor,
            })
            .unwrap();
        (plan, floor, table)
    }

    #[test]
    fn test_any_status_reaches_any_status() {
        let (mut plan, _, id) = plan_with_table();
        let all = [
            TableStatus::Available,
            TableStatus::Reserved,
            TableStatus::Filled,
            TableStatus::Occupied,
        ];
        for from in all {
            for to in all {
                plan.set_status(id, from).unwrap();
                assert_eq!(plan.set_status(id, to), Ok(from));
                assert_eq!(plan.table(id).unwrap().status, to);
            }
        }
    }

    #[test]
    fn test_timer_side_effects() {
        let (mut plan, _, id) = plan_with_table();
        assert_eq!(plan.table(id).unwrap().timer, None);

        plan.set_status(id, TableStatus::Occupied).unwrap();
        assert_eq!(plan.table(id).unwrap().timer, Some(0));

        plan.tick();
        plan.tick();
        assert_eq!(plan.table(id).unwrap().timer, Some(2));

        // Filled keeps the running timer
        plan.set_status(id, TableStatus::Filled).unwrap();
        assert_eq!(plan.table(id).unwrap().timer, Some(2));
        assert_eq!(plan.tick(), 0);
        assert_eq!(plan.table(id).unwrap().timer, Some(2));

        // Re-entering occupied resets
        plan.set_status(id, TableStatus::Occupied).unwrap();
        assert_eq!(plan.table(id).unwrap().timer, Some(0));

        plan.set_status(id, TableStatus::Available).unwrap();
        assert_eq!(plan.table(id).unwrap().timer, None);
    }

    #[test]
    fn test_tick_only_touches_occupied_tables() {
        let (mut plan, floor, a) = plan_with_table();
        let b = plan
            .add_table(TableCreate {
                number: 2,
                capacity: 2,
                shape: TableShape::Square,
                position: Position::default(),
                floor_id: floor,
            })
            .unwrap();
        plan.set_status(a, TableStatus::Occupied).unwrap();
        plan.set_status(b, TableStatus::Reserved).unwrap();

        assert_eq!(plan.tick(), 1);
        assert_eq!(plan.table(a).unwrap().timer, Some(1));
        assert_eq!(plan.table(b).unwrap().timer, None);
    }

    #[test]
    fn test_move_table_is_clamped() {
        let (mut plan, _, id) = plan_with_table();
        assert_eq!(
            plan.move_table(id, Position::new(150, 80)),
            Ok(Position::new(150, 80))
        );
        assert_eq!(
            plan.move_table(id, Position::new(-40, 5000)),
            Ok(Position::new(0, CANVAS_HEIGHT))
        );
        assert_eq!(plan.table(id).unwrap().position, Position::new(0, CANVAS_HEIGHT));
    }

    #[test]
    fn test_duplicate_table_number_rejected() {
        let (mut plan, floor, _) = plan_with_table();
        let err = plan
            .add_table(TableCreate {
                number: 1,
                capacity: 2,
                shape: TableShape::Square,
                position: Position::default(),
                floor_id: floor,
            })
            .unwrap_err();
        assert_eq!(err, TableError::DuplicateNumber(1));
    }

    #[test]
    fn test_remove_floor_with_tables_rejected() {
        let (mut plan, floor, table) = plan_with_table();
        assert_eq!(plan.remove_floor(floor), Err(TableError::FloorHasTables(floor)));

        plan.remove_table(table).unwrap();
        assert!(plan.remove_floor(floor).is_ok());
        assert!(plan.floors().is_empty());
    }

    #[test]
    fn test_occupied_table_cannot_be_removed() {
        let (mut plan, _, table) = plan_with_table();
        plan.set_status(table, TableStatus::Occupied).unwrap();
        assert!(matches!(
            plan.remove_table(table),
            Err(TableError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_status_counts_per_floor() {
        let (mut plan, main, a) = plan_with_table();
        let patio = plan.add_floor("Outdoor").unwrap();
        let b = plan
            .add_table(TableCreate {
                number: 10,
                capacity: 6,
                shape: TableShape::Rectangle,
                position: Position::default(),
                floor_id: patio,
            })
            .unwrap();
        plan.set_status(a, TableStatus::Occupied).unwrap();
        plan.set_status(b, TableStatus::Filled).unwrap();

        let all = plan.status_counts(None);
        assert_eq!(all.total(), 2);
        assert_eq!(all.occupied, 1);
        assert_eq!(all.filled, 1);

        let main_counts = plan.status_counts(Some(main));
        assert_eq!(main_counts.total(), 1);
        assert_eq!(main_counts.occupied, 1);
        assert_eq!(plan.tables_on_floor(patio).len(), 1);
    }

    #[test]
    fn test_unknown_table() {
        let mut plan = FloorPlan::new();
        assert_eq!(
            plan.set_status(5, TableStatus::Filled),
            Err(TableError::NotFound(5))
        );
    }
}
