//! POS engine - owns every piece of domain state
//!
//! Each area sits behind its own `parking_lot::RwLock`. Locks are never held
//! across an `.await`. When a flow needs two locks it takes them in this
//! order: floor plan, orders, counter, register, inventory, notifications.
//! The in-flight payment set is only locked on its own.

use super::{BackgroundTasks, Config};
use crate::cart::{AddOutcome, Cart, MenuItemRef};
use crate::inventory::Inventory;
use crate::kitchen::{self, KitchenTicket};
use crate::menu::{CustomizationSelection, Menu, resolve_customizations};
use crate::notifications::{NotificationAction, NotificationCenter};
use crate::orders::{CounterBoard, OrderBook, OrderError};
use crate::payments::{
    PaymentError, PaymentGateway, PaymentReceipt, PaymentRequest, process_payment,
};
use crate::register::{CashCount, CashRegister, RegisterError};
use crate::reports::{self, ReportExport, ReportExporter};
use crate::staff::StaffRoster;
use crate::tables::{FloorPlan, TableError, TableTimerTicker};
use crate::utils::logger::{LOG_RETENTION_DAYS, cleanup_old_logs};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use shared::models::{
    CounterOrderStatus, CutKind, CutReport, LineItemStatus, NotificationCategory, OrderSource,
    OrderStatus, SalesReport, TableStatus,
};
use shared::types::{OrderId, ProductId, TableId, Timestamp};
use shared::util::now_millis;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Interval of the log cleanup task
const LOG_CLEANUP_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Marks an order as being charged until dropped
struct PaymentClaim<'a> {
    in_flight: &'a Mutex<HashSet<OrderId>>,
    order_id: OrderId,
}

impl<'a> PaymentClaim<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<OrderId>>, order_id: OrderId) -> Result<Self, PaymentError> {
        if !in_flight.lock().insert(order_id) {
            return Err(PaymentError::InProgress(order_id));
        }
        Ok(Self { in_flight, order_id })
    }
}

impl Drop for PaymentClaim<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.order_id);
    }
}

/// The restaurant's in-memory state and the flows that span several areas
///
/// Share it as `Arc<PosEngine>`; every method takes `&self`.
pub struct PosEngine {
    config: Config,
    pub menu: RwLock<Menu>,
    pub orders: RwLock<OrderBook>,
    pub counter: RwLock<CounterBoard>,
    /// Shared with the table timer task
    pub floor_plan: Arc<RwLock<FloorPlan>>,
    /// `None` until the register is first opened
    pub register: RwLock<Option<CashRegister>>,
    pub inventory: RwLock<Inventory>,
    pub staff: RwLock<StaffRoster>,
    pub notifications: RwLock<NotificationCenter>,
    /// Orders with a payment at the gateway
    payments_in_flight: Mutex<HashSet<OrderId>>,
}

impl PosEngine {
    pub fn new(config: Config) -> Self {
        let inventory = Inventory::new(config.low_stock_ratio);
        Self {
            config,
            menu: RwLock::new(Menu::new()),
            orders: RwLock::new(OrderBook::new()),
            counter: RwLock::new(CounterBoard::new()),
            floor_plan: Arc::new(RwLock::new(FloorPlan::new())),
            register: RwLock::new(None),
            inventory: RwLock::new(inventory),
            staff: RwLock::new(StaffRoster::new()),
            notifications: RwLock::new(NotificationCenter::new()),
            payments_in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Push a notification
    pub fn notify(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
    ) {
        self.notifications
            .write()
            .dispatch(NotificationAction::add(title, message, category));
    }

    // ========== Menu -> cart ==========

    /// Add a menu item with its selected options to a cart
    pub fn add_to_cart(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        quantity: u32,
        selection: &CustomizationSelection,
    ) -> AppResult<AddOutcome> {
        let (item_ref, customizations) = {
            let menu = self.menu.read();
            let item = menu.orderable(product_id)?;
            let customizations = resolve_customizations(item, selection)?;
            (MenuItemRef::from(item), customizations)
        };
        Ok(cart.add_item(&item_ref, quantity, customizations)?)
    }

    // ========== Table service ==========

    /// Send a cart to a table
    ///
    /// The first order seats the table (`Occupied`); later carts go into the
    /// table's open order as another round. Returns the order id.
    pub fn open_table_order(
        &self,
        table_id: TableId,
        customer_name: Option<String>,
        cart: Cart,
    ) -> AppResult<OrderId> {
        let mut floor_plan = self.floor_plan.write();
        let table = floor_plan
            .table(table_id)
            .ok_or(TableError::NotFound(table_id))?;
        let number = table.number;

        let mut orders = self.orders.write();
        if let Some(open) = orders.open_order_for_table(table_id) {
            let order_id = open.id;
            let outcomes = orders.add_items(order_id, cart)?;
            drop(orders);
            drop(floor_plan);
            tracing::info!(order_id, table = number, lines = outcomes.len(), "Round added to table order");
            self.notify(
                "Order updated",
                format!("Table {number} added {} item(s)", outcomes.len()),
                NotificationCategory::Order,
            );
            return Ok(order_id);
        }

        let order_id = orders.place_order(
            OrderSource::Table {
                table_id,
                table_number: number,
            },
            customer_name,
            cart,
        )?;
        drop(orders);
        if floor_plan.table(table_id).map(|t| t.status) != Some(TableStatus::Occupied) {
            floor_plan.set_status(table_id, TableStatus::Occupied)?;
        }
        drop(floor_plan);

        self.notify(
            "Order sent to kitchen",
            format!("Table {number}"),
            NotificationCategory::Order,
        );
        Ok(order_id)
    }

    // ========== Counter ==========

    /// Take a counter order and log it in the order book
    pub fn counter_checkout(&self, customer_name: Option<String>, cart: Cart) -> AppResult<OrderId> {
        let mut orders = self.orders.write();
        let mut counter = self.counter.write();
        let id = counter.submit(customer_name, cart)?;
        counter.log_into(id, &mut orders)?;
        drop(counter);
        drop(orders);

        self.notify("Counter order", format!("Order #{id} received"), NotificationCategory::Order);
        Ok(id)
    }

    /// Advance a counter order and mirror it onto its log entry
    pub fn advance_counter_order(&self, id: OrderId) -> AppResult<CounterOrderStatus> {
        let mut orders = self.orders.write();
        let status = self.counter.write().advance(id)?;
        let line_status = match status {
            CounterOrderStatus::Pending => LineItemStatus::Pending,
            CounterOrderStatus::Preparing => LineItemStatus::Cooking,
            CounterOrderStatus::Ready | CounterOrderStatus::Delivered => LineItemStatus::Served,
        };
        if orders.get(id).is_some_and(|o| !o.is_paid()) {
            orders.set_all_items_status(id, line_status)?;
        }
        drop(orders);

        if status == CounterOrderStatus::Ready {
            self.notify("Order ready", format!("Counter order #{id}"), NotificationCategory::Kitchen);
        }
        Ok(status)
    }

    // ========== Kitchen ==========

    pub fn kitchen_queue(&self) -> Vec<KitchenTicket> {
        kitchen::kitchen_queue(&self.orders.read(), now_millis())
    }

    pub fn advance_kitchen_line(&self, order_id: OrderId, line_id: &str) -> AppResult<LineItemStatus> {
        let (status, order_status, label) = {
            let mut orders = self.orders.write();
            let status = kitchen::advance_line(&mut orders, order_id, line_id)?;
            let order = orders.get(order_id).ok_or(OrderError::NotFound(order_id))?;
            let (order_status, source) = (order.status, order.source.clone());
            self.sync_counter(&source, order_id, order_status);
            (status, order_status, source.label())
        };
        if order_status == OrderStatus::Completed {
            self.notify("Order ready", label, NotificationCategory::Kitchen);
        }
        Ok(status)
    }

    pub fn bump_kitchen_order(&self, order_id: OrderId) -> AppResult<OrderStatus> {
        let (status, label) = {
            let mut orders = self.orders.write();
            let status = kitchen::bump_order(&mut orders, order_id)?;
            let source = orders
                .get(order_id)
                .map(|o| o.source.clone())
                .ok_or(OrderError::NotFound(order_id))?;
            self.sync_counter(&source, order_id, status);
            (status, source.label())
        };
        self.notify("Order ready", label, NotificationCategory::Kitchen);
        Ok(status)
    }

    /// Bring a counter order's screen status up to the kitchen's progress
    ///
    /// Called with the orders lock held; takes the counter lock after it.
    fn sync_counter(&self, source: &OrderSource, order_id: OrderId, status: OrderStatus) {
        if *source != OrderSource::Counter {
            return;
        }
        if let Err(e) = self
            .counter
            .write()
            .catch_up(order_id, CounterOrderStatus::from_kitchen(status))
        {
            tracing::warn!(order_id, error = %e, "Counter order missing from the counter screen");
        }
    }

    // ========== Payment ==========

    /// Charge an order
    ///
    /// On approval the sale goes into the register, the order is marked paid
    /// and a table order frees its table. All three happen under one set of
    /// locks after the gateway returns, or none of them do. A cancelled or
    /// declined payment changes nothing. Only one payment per order can be
    /// in flight at a time.
    pub async fn pay_order(
        &self,
        order_id: OrderId,
        request: &PaymentRequest,
        gateway: &dyn PaymentGateway,
        cancel: &CancellationToken,
    ) -> AppResult<PaymentReceipt> {
        if request.order_id != order_id {
            return Err(AppError::validation(format!(
                "Payment is for order {}, not {order_id}",
                request.order_id
            )));
        }
        let total = {
            let orders = self.orders.read();
            let order = orders.get(order_id).ok_or(OrderError::NotFound(order_id))?;
            if order.is_paid() {
                return Err(OrderError::AlreadyPaid(order_id).into());
            }
            order.total
        };
        if !self.register.read().as_ref().is_some_and(CashRegister::is_open) {
            return Err(RegisterError::Closed.into());
        }

        let _claim = PaymentClaim::acquire(&self.payments_in_flight, order_id)?;
        let receipt = process_payment(gateway, request, total, cancel).await?;

        {
            let mut floor_plan = self.floor_plan.write();
            let mut orders = self.orders.write();
            let mut register = self.register.write();

            // State may have moved while the gateway was running
            let order = orders.get(order_id).ok_or(OrderError::NotFound(order_id))?;
            if order.is_paid() {
                return Err(OrderError::AlreadyPaid(order_id).into());
            }
            if order.total != total {
                return Err(AppError::business_rule(format!(
                    "Order {order_id} changed while the payment was processing"
                )));
            }
            let table_id = order.source.table_id();
            if let Some(table_id) = table_id
                && floor_plan.table(table_id).is_none()
            {
                return Err(TableError::NotFound(table_id).into());
            }
            let register = register
                .as_mut()
                .filter(|r| r.is_open())
                .ok_or(RegisterError::Closed)?;

            register.record_sale(receipt.method, total)?;
            orders.mark_paid(order_id, receipt.method, receipt.processed_at)?;
            if let Some(table_id) = table_id {
                floor_plan.set_status(table_id, TableStatus::Available)?;
            }
        }

        self.notify(
            "Payment received",
            format!("Order #{order_id}: {}", total),
            NotificationCategory::Payment,
        );
        Ok(receipt)
    }

    // ========== Register ==========

    /// Open the register with the configured opening float
    pub fn open_register(&self) -> AppResult<()> {
        let mut register = self.register.write();
        if register.as_ref().is_some_and(CashRegister::is_open) {
            return Err(AppError::business_rule("Register is already open"));
        }
        *register = Some(CashRegister::open(self.config.opening_float)?);
        Ok(())
    }

    /// Take a cut; a final cut closes the register
    pub fn cut_register(&self, kind: CutKind, declared: CashCount, is_blind: bool) -> AppResult<CutReport> {
        let orders = self.orders.read();
        let mut register = self.register.write();
        let report = register
            .as_mut()
            .ok_or(RegisterError::Closed)?
            .cut(kind, declared, is_blind, &orders)?;
        drop(register);
        drop(orders);

        if let Some(difference) = report.result.difference
            && !difference.is_zero()
        {
            self.notify(
                "Cash difference",
                format!("Cut is off by {difference}"),
                NotificationCategory::System,
            );
        }
        Ok(report)
    }

    pub fn cash_movement(&self, amount: Decimal, reason: &str, cash_in: bool) -> AppResult<Decimal> {
        let mut register = self.register.write();
        let register = register.as_mut().ok_or(RegisterError::Closed)?;
        let expected = if cash_in {
            register.cash_in(amount, reason)?
        } else {
            register.cash_out(amount, reason)?
        };
        Ok(expected)
    }

    // ========== Inventory ==========

    /// Take stock out; a notification is raised when the item runs low
    pub fn consume_stock(&self, item_id: i64, quantity: Decimal, reason: &str) -> AppResult<Decimal> {
        let (remaining, low_name) = {
            let mut inventory = self.inventory.write();
            let remaining = inventory.consume(item_id, quantity, reason)?;
            let low_name = inventory
                .get(item_id)
                .filter(|item| inventory.is_low(item))
                .map(|item| item.name.clone());
            (remaining, low_name)
        };
        if let Some(name) = low_name {
            self.notify(
                "Low stock",
                format!("{name}: {remaining} left"),
                NotificationCategory::Inventory,
            );
        }
        Ok(remaining)
    }

    // ========== Reports ==========

    pub fn sales_report(&self, from: Timestamp, to: Timestamp) -> AppResult<SalesReport> {
        Ok(reports::sales_report(&self.orders.read(), from, to)?)
    }

    pub async fn export_report(
        &self,
        report: &SalesReport,
        cancel: &CancellationToken,
    ) -> AppResult<ReportExport> {
        let exporter = ReportExporter::new(self.config.export_delay());
        let export = exporter.export(report, cancel).await?;
        self.notify("Report exported", export.file_name.clone(), NotificationCategory::System);
        Ok(export)
    }

    // ========== Background tasks ==========

    /// Start the table timer and, when file logging is on, log cleanup
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let ticker = TableTimerTicker::new(self.floor_plan.clone(), self.config.table_timer_tick());
        let token = tasks.shutdown_token();
        tasks.spawn("table_timer", async move {
            ticker.run(token).await;
        });

        if let Some(dir) = &self.config.log_dir {
            let dir = PathBuf::from(dir);
            tasks.spawn_periodic("log_cleanup", LOG_CLEANUP_PERIOD, move || {
                match cleanup_old_logs(&dir, LOG_RETENTION_DAYS) {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(deleted, "Old log files removed"),
                    Err(e) => tracing::warn!(error = %e, "Log cleanup failed"),
                }
            });
        }

        tracing::info!(tasks = ?tasks.names(), "Background tasks started");
        tasks
    }
}
