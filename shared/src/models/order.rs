//! Order Model

use crate::types::{OrderId, ProductId, TableId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Paid extra attached to a line (e.g. "Size: Medium" +0.50)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extra {
    pub name: String,
    /// Price delta per unit
    pub price: Decimal,
}

impl Extra {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Customizations selected for a line item
///
/// Both lists are compared as unordered sets when deciding whether two lines
/// are the same line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customizations {
    #[serde(default)]
    pub removed_ingredients: Vec<String>,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

impl Customizations {
    pub fn is_empty(&self) -> bool {
        self.removed_ingredients.is_empty() && self.extras.is_empty()
    }

    /// Sum of the extras' price deltas
    pub fn extras_total(&self) -> Decimal {
        self.extras.iter().map(|e| e.price).sum()
    }
}

/// Kitchen status of a single line, ordered by progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemStatus {
    #[default]
    Pending,
    Cooking,
    Served,
}

impl LineItemStatus {
    /// Next status on the kitchen display (served stays served)
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::Cooking,
            Self::Cooking | Self::Served => Self::Served,
        }
    }
}

/// One row in a cart or order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Client-generated id (timestamp + random suffix)
    pub id: String,
    pub product_id: ProductId,
    pub name: String,
    /// Effective unit price including selected extras
    pub price: Decimal,
    pub quantity: u32,
    pub status: LineItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Customizations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LineItem {
    /// Unit price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Paid,
}

/// Where an order was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderSource {
    Table { table_id: TableId, table_number: u32 },
    Counter,
}

impl OrderSource {
    pub fn table_id(&self) -> Option<TableId> {
        match self {
            Self::Table { table_id, .. } => Some(*table_id),
            Self::Counter => None,
        }
    }

    /// Short label for tickets and logs ("Table 4", "Counter")
    pub fn label(&self) -> String {
        match self {
            Self::Table { table_number, .. } => format!("Table {}", table_number),
            Self::Counter => "Counter".to_string(),
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
        }
    }
}

/// Placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub source: OrderSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    /// Sum of line totals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Status shown on the counter screen, ordered by progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterOrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
}

impl From<CounterOrderStatus> for OrderStatus {
    fn from(status: CounterOrderStatus) -> Self {
        match status {
            CounterOrderStatus::Pending => OrderStatus::New,
            CounterOrderStatus::Preparing => OrderStatus::InProgress,
            CounterOrderStatus::Ready | CounterOrderStatus::Delivered => OrderStatus::Completed,
        }
    }
}

impl CounterOrderStatus {
    /// Counter status matching the kitchen's progress on the logged order
    pub fn from_kitchen(status: OrderStatus) -> Self {
        match status {
            OrderStatus::New => Self::Pending,
            OrderStatus::InProgress => Self::Preparing,
            OrderStatus::Completed | OrderStatus::Paid => Self::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(price: &str, quantity: u32) -> LineItem {
        LineItem {
            id: "l1".to_string(),
            product_id: 1,
            name: "Latte".to_string(),
            price: dec(price),
            quantity,
            status: LineItemStatus::Pending,
            customizations: None,
            note: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line("4.00", 2).line_total(), dec("8.00"));
        assert_eq!(line("10.99", 3).line_total(), dec("32.97"));
    }

    #[test]
    fn test_extras_total() {
        let c = Customizations {
            removed_ingredients: vec!["onion".to_string()],
            extras: vec![
                Extra::new("Size: Large", dec("1.00")),
                Extra::new("Extra shot", dec("0.75")),
            ],
        };
        assert_eq!(c.extras_total(), dec("1.75"));
        assert!(!c.is_empty());
        assert!(Customizations::default().is_empty());
    }

    #[test]
    fn test_line_status_next() {
        assert_eq!(LineItemStatus::Pending.next(), LineItemStatus::Cooking);
        assert_eq!(LineItemStatus::Cooking.next(), LineItemStatus::Served);
        assert_eq!(LineItemStatus::Served.next(), LineItemStatus::Served);
    }

    #[test]
    fn test_counter_status_maps_to_order_status() {
        assert_eq!(OrderStatus::from(CounterOrderStatus::Pending), OrderStatus::New);
        assert_eq!(
            OrderStatus::from(CounterOrderStatus::Preparing),
            OrderStatus::InProgress
        );
        assert_eq!(
            OrderStatus::from(CounterOrderStatus::Delivered),
            OrderStatus::Completed
        );
    }

    #[test]
    fn test_order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_order_source_label() {
        let source = OrderSource::Table {
            table_id: 9,
            table_number: 4,
        };
        assert_eq!(source.label(), "Table 4");
        assert_eq!(source.table_id(), Some(9));
        assert_eq!(OrderSource::Counter.label(), "Counter");
    }
}
