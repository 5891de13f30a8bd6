//! Kitchen display
//!
//! Tickets are a read-only view over the order book. Advancing a line writes
//! back through [`OrderBook::set_item_status`] so the order status stays
//! derived in one place.

use crate::orders::{OrderBook, OrderError};
use serde::{Deserialize, Serialize};
use shared::models::{LineItemStatus, Order, OrderStatus};
use shared::types::{OrderId, Timestamp};

/// One line on a kitchen ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketLine {
    pub line_id: String,
    pub name: String,
    pub quantity: u32,
    pub status: LineItemStatus,
    /// Removed ingredients and extras, as printed on the ticket
    pub modifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An order as the kitchen sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenTicket {
    pub order_id: OrderId,
    /// "Table 4" / "Counter"
    pub label: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    /// Minutes since the order was placed
    pub age_minutes: i64,
    pub lines: Vec<TicketLine>,
}

impl KitchenTicket {
    fn from_order(order: &Order, now: Timestamp) -> Self {
        let lines = order
            .items
            .iter()
            .filter(|l| l.status != LineItemStatus::Served)
            .map(|l| TicketLine {
                line_id: l.id.clone(),
                name: l.name.clone(),
                quantity: l.quantity,
                status: l.status,
                modifiers: l
                    .customizations
                    .iter()
                    .flat_map(|c| {
                        c.removed_ingredients
                            .iter()
                            .map(|i| format!("No {}", i))
                            .chain(c.extras.iter().map(|e| e.name.clone()))
                    })
                    .collect(),
                note: l.note.clone(),
            })
            .collect();

        Self {
            order_id: order.id,
            label: order.source.label(),
            status: order.status,
            created_at: order.created_at,
            age_minutes: ((now - order.created_at) / 60_000).max(0),
            lines,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.status == LineItemStatus::Pending)
            .count()
    }
}

/// Unpaid orders with at least one line not served, oldest first
pub fn kitchen_queue(book: &OrderBook, now: Timestamp) -> Vec<KitchenTicket> {
    let mut tickets: Vec<KitchenTicket> = book
        .list()
        .iter()
        .filter(|o| !o.is_paid())
        .filter(|o| o.items.iter().any(|l| l.status != LineItemStatus::Served))
        .map(|o| KitchenTicket::from_order(o, now))
        .collect();
    tickets.sort_by_key(|t| t.created_at);
    tickets
}

/// Move a line one step: pending → cooking → served
pub fn advance_line(
    book: &mut OrderBook,
    order_id: OrderId,
    line_id: &str,
) -> Result<LineItemStatus, OrderError> {
    let current = book
        .get(order_id)
        .ok_or(OrderError::NotFound(order_id))?
        .items
        .iter()
        .find(|l| l.id == line_id)
        .map(|l| l.status)
        .ok_or_else(|| OrderError::LineNotFound {
            order_id,
            line_id: line_id.to_string(),
        })?;
    let next = current.next();
    book.set_item_status(order_id, line_id, next)?;
    Ok(next)
}

/// Mark every line of an order served
pub fn bump_order(book: &mut OrderBook, order_id: OrderId) -> Result<OrderStatus, OrderError> {
    let status = book.set_all_items_status(order_id, LineItemStatus::Served)?;
    tracing::info!(order_id, "Order bumped from kitchen display");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, MenuItemRef};
    use shared::models::{Customizations, Extra, OrderSource};

    fn dec(s: &str) -> rust_decimal::Decimal {
        s.parse().unwrap()
    }

    fn place(book: &mut OrderBook, table_number: u32, created_at: Timestamp) -> OrderId {
        let cart = Cart::new()
            .with_item(&MenuItemRef::new(1, "Burger", dec("9")), 1, None)
            .unwrap()
            .with_item(
                &MenuItemRef::new(2, "Tacos", dec("7")),
                2,
                Some(Customizations {
                    removed_ingredients: vec!["cilantro".into()],
                    extras: vec![Extra::new("Salsa: Verde", dec("0.50"))],
                }),
            )
            .unwrap();
        book.place_order_at(
            OrderSource::Table {
                table_id: i64::from(table_number),
                table_number,
            },
            None,
            cart,
            created_at,
        )
        .unwrap()
    }

    #[test]
    fn test_queue_is_oldest_first() {
        let mut book = OrderBook::new();
        let newer = place(&mut book, 2, 120_000);
        let older = place(&mut book, 1, 0);

        let queue = kitchen_queue(&book, 180_000);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].order_id, older);
        assert_eq!(queue[0].age_minutes, 3);
        assert_eq!(queue[1].order_id, newer);
        assert_eq!(queue[1].label, "Table 2");
    }

    #[test]
    fn test_ticket_modifiers() {
        let mut book = OrderBook::new();
        place(&mut book, 1, 0);
        let ticket = &kitchen_queue(&book, 0)[0];
        assert_eq!(ticket.lines[1].modifiers, vec!["No cilantro", "Salsa: Verde"]);
        assert!(ticket.lines[0].modifiers.is_empty());
        assert_eq!(ticket.pending_count(), 2);
    }

    #[test]
    fn test_advance_line_walks_statuses() {
        let mut book = OrderBook::new();
        let id = place(&mut book, 1, 0);
        let line = book.get(id).unwrap().items[0].id.clone();

        assert_eq!(advance_line(&mut book, id, &line), Ok(LineItemStatus::Cooking));
        assert_eq!(book.get(id).unwrap().status, OrderStatus::InProgress);
        assert_eq!(advance_line(&mut book, id, &line), Ok(LineItemStatus::Served));

        // Served lines drop off the ticket
        let ticket = &kitchen_queue(&book, 0)[0];
        assert_eq!(ticket.lines.len(), 1);
    }

    #[test]
    fn test_bump_order_completes_and_leaves_queue() {
        let mut book = OrderBook::new();
        let id = place(&mut book, 1, 0);
        assert_eq!(bump_order(&mut book, id), Ok(OrderStatus::Completed));
        assert!(kitchen_queue(&book, 0).is_empty());
    }

    #[test]
    fn test_advance_unknown_line() {
        let mut book = OrderBook::new();
        let id = place(&mut book, 1, 0);
        assert!(matches!(
            advance_line(&mut book, id, "nope"),
            Err(OrderError::LineNotFound { .. })
        ));
        assert_eq!(
            advance_line(&mut book, 42, "nope"),
            Err(OrderError::NotFound(42))
        );
    }
}
