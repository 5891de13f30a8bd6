use super::{OrderBook, OrderError};
use crate::cart::Cart;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    CounterOrderStatus, LineItem, LineItemStatus, Order, OrderSource, OrderStatus,
};
use shared::types::{OrderId, Timestamp};
use shared::util::{now_millis, snowflake_id};

/// Order taken at the counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterOrder {
    pub id: OrderId,
    pub customer_name: Option<String>,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub status: CounterOrderStatus,
    pub created_at: Timestamp,
}

impl CounterOrder {
    /// The same order as the order log sees it
    ///
    /// The counter status maps explicitly onto the log's status, and the
    /// lines' kitchen status follows so the log derives the same value.
    pub fn to_order(&self) -> Order {
        let line_status = match self.status {
            CounterOrderStatus::Pending => LineItemStatus::Pending,
            CounterOrderStatus::Preparing => LineItemStatus::Cooking,
            CounterOrderStatus::Ready | CounterOrderStatus::Delivered => LineItemStatus::Served,
        };
        Order {
            id: self.id,
            source: OrderSource::Counter,
            customer_name: self.customer_name.clone(),
            items: self
                .items
                .iter()
                .cloned()
                .map(|mut l| {
                    l.status = line_status;
                    l
                })
                .collect(),
            status: OrderStatus::from(self.status),
            created_at: self.created_at,
            total: self.total,
            payment_method: None,
            payment_date: None,
            note: None,
        }
    }
}

fn next_status(status: CounterOrderStatus) -> CounterOrderStatus {
    match status {
        CounterOrderStatus::Pending => CounterOrderStatus::Preparing,
        CounterOrderStatus::Preparing => CounterOrderStatus::Ready,
        CounterOrderStatus::Ready | CounterOrderStatus::Delivered => CounterOrderStatus::Delivered,
    }
}

/// Counter screen state
#[derive(Debug, Clone, Default)]
pub struct CounterBoard {
    orders: Vec<CounterOrder>,
}

impl CounterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a counter order; starts `Pending`
    pub fn submit(
        &mut self,
        customer_name: Option<String>,
        cart: Cart,
    ) -> Result<OrderId, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::Empty);
        }
        let id = snowflake_id();
        let total = cart.total();
        tracing::info!(order_id = id, total = %total, "Counter order taken");
        self.orders.push(CounterOrder {
            id,
            customer_name: customer_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            items: cart.into_lines(),
            total,
            status: CounterOrderStatus::Pending,
            created_at: now_millis(),
        });
        Ok(id)
    }

    /// Move an order one step: pending → preparing → ready → delivered
    pub fn advance(&mut self, id: OrderId) -> Result<CounterOrderStatus, OrderError> {
        let order = self.get_mut(id)?;
        order.status = next_status(order.status);
        tracing::info!(order_id = id, status = ?order.status, "Counter order advanced");
        Ok(order.status)
    }

    pub fn set_status(
        &mut self,
        id: OrderId,
        status: CounterOrderStatus,
    ) -> Result<(), OrderError> {
        self.get_mut(id)?.status = status;
        Ok(())
    }

    /// Raise an order to at least `status` (the kitchen got ahead of the
    /// counter); returns the resulting status
    pub fn catch_up(
        &mut self,
        id: OrderId,
        status: CounterOrderStatus,
    ) -> Result<CounterOrderStatus, OrderError> {
        let order = self.get_mut(id)?;
        if status > order.status {
            tracing::info!(order_id = id, from = ?order.status, to = ?status, "Counter order caught up with kitchen");
            order.status = status;
        }
        Ok(order.status)
    }

    pub fn get(&self, id: OrderId) -> Option<&CounterOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn list(&self) -> &[CounterOrder] {
        &self.orders
    }

    /// Orders still on the screen (not delivered)
    pub fn active(&self) -> Vec<&CounterOrder> {
        self.orders
            .iter()
            .filter(|o| o.status != CounterOrderStatus::Delivered)
            .collect()
    }

    pub fn by_status(&self, status: CounterOrderStatus) -> Vec<&CounterOrder> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    /// Copy a counter order into the order log
    ///
    /// Pending orders are logged too (as `New`).
    pub fn log_into(&self, id: OrderId, book: &mut OrderBook) -> Result<OrderId, OrderError> {
        let order = self.get(id).ok_or(OrderError::NotFound(id))?;
        book.import(order.to_order())
    }

    fn get_mut(&mut self, id: OrderId) -> Result<&mut CounterOrder, OrderError> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(OrderError::NotFound(id))
    }
}
