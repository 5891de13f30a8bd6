//! Menu Model (dishes)

use crate::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// One selectable option of a customization group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    /// Price delta per unit (may be zero)
    #[serde(default)]
    pub price: Decimal,
}

/// Named customization choice (e.g. "Size", "Milk")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationGroup {
    pub name: String,
    /// A selection is mandatory before the item can be added
    #[serde(default)]
    pub required: bool,
    /// More than one option may be picked
    #[serde(default)]
    pub multi_select: bool,
    pub options: Vec<CustomizationOption>,
}

impl CustomizationGroup {
    pub fn option(&self, name: &str) -> Option<&CustomizationOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Menu item (dish / drink)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ProductId,
    pub name: String,
    pub category_id: i64,
    pub base_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ingredients the guest may ask to remove
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub customization_groups: Vec<CustomizationGroup>,
    pub available: bool,
}

impl MenuItem {
    pub fn group(&self, name: &str) -> Option<&CustomizationGroup> {
        self.customization_groups.iter().find(|g| g.name == name)
    }

    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients.iter().any(|i| i == name)
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub category_id: i64,
    pub base_price: Decimal,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub customization_groups: Vec<CustomizationGroup>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub base_price: Option<Decimal>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
