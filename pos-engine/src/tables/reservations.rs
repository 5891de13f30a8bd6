use super::{FloorPlan, TableError};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::models::{Reservation, ReservationCreate, TableStatus};
use shared::types::TableId;
use shared::util::snowflake_id;

impl FloorPlan {
    /// Reserve an available table
    pub fn reserve(&mut self, payload: ReservationCreate) -> Result<i64, TableError> {
        validate_required_text(&payload.customer_name, "customer name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
        if payload.party_size == 0 {
            return Err(TableError::Invalid(
                "party size must be greater than zero".to_string(),
            ));
        }

        let table = self
            .table(payload.table_id)
            .ok_or(TableError::NotFound(payload.table_id))?;
        if payload.party_size > table.capacity {
            return Err(TableError::CapacityExceeded {
                party_size: payload.party_size,
                capacity: table.capacity,
            });
        }
        if table.status != TableStatus::Available {
            return Err(TableError::Unavailable {
                number: table.number,
                status: table.status,
            });
        }

        self.set_status(payload.table_id, TableStatus::Reserved)?;
        let id = snowflake_id();
        tracing::info!(
            reservation_id = id,
            table_id = payload.table_id,
            party_size = payload.party_size,
            "Reservation created"
        );
        self.reservations.push(Reservation {
            id,
            table_id: payload.table_id,
            customer_name: payload.customer_name.trim().to_string(),
            party_size: payload.party_size,
            at: payload.at,
            note: payload.note,
        });
        Ok(id)
    }

    /// Cancel a reservation; a still-reserved table becomes available again
    pub fn cancel_reservation(&mut self, reservation_id: i64) -> Result<Reservation, TableError> {
        let reservation = self.take_reservation(reservation_id)?;
        if self
            .table(reservation.table_id)
            .is_some_and(|t| t.status == TableStatus::Reserved)
        {
            self.set_status(reservation.table_id, TableStatus::Available)?;
        }
        tracing::info!(reservation_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// The guests arrived: drop the reservation and occupy the table
    pub fn seat_reservation(&mut self, reservation_id: i64) -> Result<TableId, TableError> {
        let reservation = self.take_reservation(reservation_id)?;
        self.set_status(reservation.table_id, TableStatus::Occupied)?;
        Ok(reservation.table_id)
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn reservations_for_table(&self, table_id: TableId) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.table_id == table_id)
            .collect()
    }

    fn take_reservation(&mut self, reservation_id: i64) -> Result<Reservation, TableError> {
        let idx = self
            .reservations
            .iter()
            .position(|r| r.id == reservation_id)
            .ok_or(TableError::ReservationNotFound(reservation_id))?;
        Ok(self.reservations.remove(idx))
    }
}
