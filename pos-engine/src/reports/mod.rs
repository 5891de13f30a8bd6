//! Sales reports
//!
//! Reports are computed from the order book on demand. A paid order counts
//! towards the range its `payment_date` falls in; `order_count` counts orders
//! created in the range whether paid or not.

mod export;

pub use export::{ReportExport, ReportExporter, verify_checksum};

use crate::money::round_money;
use crate::orders::OrderBook;
use chrono::{DateTime, Timelike};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{HourlySales, ItemSales, Order, PaymentMethod, PaymentMethodBreakdown, SalesReport};
use shared::types::{ProductId, Timestamp};
use shared::util::now_millis;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Best sellers kept in a report
pub const TOP_ITEMS_LIMIT: usize = 10;

/// Report errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid report range: from {from} must be before to {to}")]
    InvalidRange { from: Timestamp, to: Timestamp },

    #[error("Report export was cancelled")]
    Cancelled,

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let code = match &err {
            ReportError::InvalidRange { .. } => ErrorCode::ValueOutOfRange,
            ReportError::Cancelled => ErrorCode::TimeoutError,
            ReportError::Serialize(_) => ErrorCode::InternalError,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Hour of day (UTC) for a millisecond timestamp
fn hour_of(ts: Timestamp) -> u32 {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.hour())
        .unwrap_or(0)
}

/// Build a sales report over `[from, to)`
pub fn sales_report(book: &OrderBook, from: Timestamp, to: Timestamp) -> Result<SalesReport, ReportError> {
    if from >= to {
        return Err(ReportError::InvalidRange { from, to });
    }

    let order_count = book
        .list()
        .iter()
        .filter(|o| o.created_at >= from && o.created_at < to)
        .count() as u32;
    let paid = book.paid_between(from, to);
    let paid_count = paid.len() as u32;
    let gross_sales = round_money(paid.iter().map(|o| o.total).sum());
    let average_ticket = if paid_count == 0 {
        Decimal::ZERO
    } else {
        round_money(gross_sales / Decimal::from(paid_count))
    };

    let report = SalesReport {
        from,
        to,
        order_count,
        paid_count,
        gross_sales,
        average_ticket,
        by_payment_method: by_payment_method(&paid),
        top_items: top_items(&paid, TOP_ITEMS_LIMIT),
        by_hour: by_hour(&paid),
        generated_at: now_millis(),
    };
    tracing::debug!(from, to, paid_count, gross = %report.gross_sales, "Sales report built");
    Ok(report)
}

fn by_payment_method(paid: &[&Order]) -> Vec<PaymentMethodBreakdown> {
    let mut totals: BTreeMap<PaymentMethod, (Decimal, u32)> = BTreeMap::new();
    for order in paid {
        let Some(method) = order.payment_method else {
            continue;
        };
        let entry = totals.entry(method).or_insert((Decimal::ZERO, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(method, (amount, count))| PaymentMethodBreakdown {
            method,
            amount: round_money(amount),
            count,
        })
        .collect()
}

/// Best sellers by revenue, then units, then name
fn top_items(paid: &[&Order], limit: usize) -> Vec<ItemSales> {
    let mut by_product: HashMap<ProductId, ItemSales> = HashMap::new();
    for line in paid.iter().flat_map(|o| o.items.iter()) {
        let entry = by_product.entry(line.product_id).or_insert_with(|| ItemSales {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: 0,
            revenue: Decimal::ZERO,
        });
        entry.quantity += line.quantity;
        entry.revenue += line.line_total();
    }

    let mut items: Vec<ItemSales> = by_product
        .into_values()
        .map(|mut item| {
            item.revenue = round_money(item.revenue);
            item
        })
        .collect();
    items.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.quantity.cmp(&a.quantity))
            .then_with(|| a.name.cmp(&b.name))
    });
    items.truncate(limit);
    items
}

/// Hours with at least one payment, ascending
fn by_hour(paid: &[&Order]) -> Vec<HourlySales> {
    let mut hours: BTreeMap<u32, (u32, Decimal)> = BTreeMap::new();
    for order in paid {
        let Some(paid_at) = order.payment_date else {
            continue;
        };
        let entry = hours.entry(hour_of(paid_at)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += order.total;
    }
    hours
        .into_iter()
        .map(|(hour, (order_count, revenue))| HourlySales {
            hour,
            order_count,
            revenue: round_money(revenue),
        })
        .collect()
}
