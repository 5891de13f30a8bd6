use super::OrderError;
use crate::cart::{AddOutcome, Cart, LineIdentity, MenuItemRef, aggregate_line};
use crate::money::round_money;
use rust_decimal::Decimal;
use shared::models::{
    LineItem, LineItemStatus, Order, OrderSource, OrderStatus, PaymentMethod,
};
use shared::types::{OrderId, TableId, Timestamp};
use shared::util::{now_millis, snowflake_id};

/// Order status implied by the kitchen status of its lines
///
/// All served ⇒ `Completed`; any line started ⇒ `InProgress`; else `New`.
pub fn derive_status(items: &[LineItem]) -> OrderStatus {
    if !items.is_empty() && items.iter().all(|l| l.status == LineItemStatus::Served) {
        OrderStatus::Completed
    } else if items.iter().any(|l| l.status != LineItemStatus::Pending) {
        OrderStatus::InProgress
    } else {
        OrderStatus::New
    }
}

/// Session order log
///
/// Orders are appended and mutated in place, never removed. A paid order is
/// frozen: further item or status changes are rejected.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    identity: LineIdentity,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: LineIdentity) -> Self {
        Self {
            orders: Vec::new(),
            identity,
        }
    }

    /// Place a new order from a cart
    pub fn place_order(
        &mut self,
        source: OrderSource,
        customer_name: Option<String>,
        cart: Cart,
    ) -> Result<OrderId, OrderError> {
        self.place_order_at(source, customer_name, cart, now_millis())
    }

    /// [`OrderBook::place_order`] with an explicit creation time
    pub fn place_order_at(
        &mut self,
        source: OrderSource,
        customer_name: Option<String>,
        cart: Cart,
        created_at: Timestamp,
    ) -> Result<OrderId, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::Empty);
        }

        let total = cart.total();
        let id = snowflake_id();
        let customer_name = customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        tracing::info!(
            order_id = id,
            source = %source.label(),
            items = cart.item_count(),
            total = %total,
            "Order placed"
        );

        self.orders.push(Order {
            id,
            source,
            customer_name,
            items: cart.into_lines(),
            status: OrderStatus::New,
            created_at,
            total,
            payment_method: None,
            payment_date: None,
            note: None,
        });
        Ok(id)
    }

    /// Add another round to an open order
    ///
    /// Lines merge with the same rule as the cart, but only into lines the
    /// kitchen has not started yet.
    pub fn add_items(
        &mut self,
        order_id: OrderId,
        cart: Cart,
    ) -> Result<Vec<AddOutcome>, OrderError> {
        let identity = self.identity;
        let order = self.open_order_mut(order_id)?;
        if cart.is_empty() {
            return Err(OrderError::Empty);
        }

        // Work on a copy so a failed line leaves the order untouched
        let mut items = order.items.clone();
        let mut outcomes = Vec::with_capacity(cart.len());
        for line in cart.into_lines() {
            let extras = line
                .customizations
                .as_ref()
                .map(|c| c.extras_total())
                .unwrap_or(Decimal::ZERO);
            let item = MenuItemRef::new(line.product_id, line.name.clone(), line.price - extras);
            let outcome = aggregate_line(
                &mut items,
                identity,
                &item,
                line.quantity,
                line.customizations,
                |existing| existing.status == LineItemStatus::Pending,
            )?;
            if let (AddOutcome::Appended { line_id }, Some(note)) = (&outcome, line.note)
                && let Some(added) = items.iter_mut().find(|l| &l.id == line_id)
            {
                added.note = Some(note);
            }
            outcomes.push(outcome);
        }

        order.items = items;
        Self::refresh(order);
        tracing::info!(order_id, total = %order.total, "Order updated");
        Ok(outcomes)
    }

    /// Raise the kitchen status of one line; returns the order's new status
    ///
    /// A line never moves back: a lower `status` leaves it where it is.
    pub fn set_item_status(
        &mut self,
        order_id: OrderId,
        line_id: &str,
        status: LineItemStatus,
    ) -> Result<OrderStatus, OrderError> {
        let order = self.open_order_mut(order_id)?;
        let line = order
            .items
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| OrderError::LineNotFound {
                order_id,
                line_id: line_id.to_string(),
            })?;
        line.status = line.status.max(status);
        tracing::debug!(order_id, line_id, status = ?line.status, "Line status changed");

        let before = order.status;
        Self::refresh(order);
        if order.status != before {
            tracing::info!(order_id, status = ?order.status, "Order status changed");
        }
        Ok(order.status)
    }

    /// Raise every line of an order to at least `status`
    pub fn set_all_items_status(
        &mut self,
        order_id: OrderId,
        status: LineItemStatus,
    ) -> Result<OrderStatus, OrderError> {
        let order = self.open_order_mut(order_id)?;
        for line in &mut order.items {
            line.status = line.status.max(status);
        }
        Self::refresh(order);
        Ok(order.status)
    }

    /// Mark an order paid
    pub fn mark_paid(
        &mut self,
        order_id: OrderId,
        method: PaymentMethod,
        paid_at: Timestamp,
    ) -> Result<&Order, OrderError> {
        let order = self.open_order_mut(order_id)?;
        order.status = OrderStatus::Paid;
        order.payment_method = Some(method);
        order.payment_date = Some(paid_at);
        tracing::info!(order_id, method = method.as_str(), total = %order.total, "Order paid");
        Ok(&*order)
    }

    pub fn set_note(&mut self, order_id: OrderId, note: Option<String>) -> Result<(), OrderError> {
        let order = self.open_order_mut(order_id)?;
        order.note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(())
    }

    /// Record an order built elsewhere (counter screen)
    pub fn import(&mut self, order: Order) -> Result<OrderId, OrderError> {
        if order.items.is_empty() {
            return Err(OrderError::Empty);
        }
        if self.get(order.id).is_some() {
            return Err(OrderError::Duplicate(order.id));
        }
        tracing::info!(order_id = order.id, status = ?order.status, "Order logged");
        let id = order.id;
        self.orders.push(order);
        Ok(id)
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// All orders, oldest first
    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    pub fn for_table(&self, table_id: TableId) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.source.table_id() == Some(table_id))
            .collect()
    }

    /// The unpaid order currently running on a table, if any
    pub fn open_order_for_table(&self, table_id: TableId) -> Option<&Order> {
        self.orders
            .iter()
            .find(|o| !o.is_paid() && o.source.table_id() == Some(table_id))
    }

    /// Orders that are not paid yet
    pub fn open_orders(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| !o.is_paid()).collect()
    }

    /// Paid orders with a payment date in `[from, to)`
    pub fn paid_between(&self, from: Timestamp, to: Timestamp) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.is_paid())
            .filter(|o| o.payment_date.is_some_and(|d| d >= from && d < to))
            .collect()
    }

    fn open_order_mut(&mut self, order_id: OrderId) -> Result<&mut Order, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        if order.is_paid() {
            return Err(OrderError::AlreadyPaid(order_id));
        }
        Ok(order)
    }

    fn refresh(order: &mut Order) {
        order.total = round_money(order.items_total());
        order.status = derive_status(&order.items);
    }
}
