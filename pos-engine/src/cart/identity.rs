//! "Same line" rule
//!
//! Two entries are the same line iff the product identity matches and the
//! customization sets are equal: both absent, or both present with the same
//! removed ingredients (unordered set) and the same extras (unordered, but
//! a repeated extra counts once per occurrence since each one is charged).

use super::MenuItemRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Customizations, LineItem};
use std::collections::BTreeSet;

/// Which field identifies "the same product"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineIdentity {
    /// Key by product id (default)
    #[default]
    ProductId,
    /// Key by product name
    Name,
}

impl LineIdentity {
    fn matches(self, line: &LineItem, item: &MenuItemRef) -> bool {
        match self {
            Self::ProductId => line.product_id == item.product_id,
            Self::Name => line.name == item.name,
        }
    }
}

fn removed_set(c: &Customizations) -> BTreeSet<&str> {
    c.removed_ingredients.iter().map(String::as_str).collect()
}

fn extras_multiset(c: &Customizations) -> Vec<(&str, Decimal)> {
    let mut extras: Vec<_> = c
        .extras
        .iter()
        .map(|e| (e.name.as_str(), e.price.normalize()))
        .collect();
    extras.sort_unstable();
    extras
}

/// Customization equality (order-insensitive)
pub fn customizations_equal(a: Option<&Customizations>, b: Option<&Customizations>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => removed_set(a) == removed_set(b) && extras_multiset(a) == extras_multiset(b),
        _ => false,
    }
}

/// Whether `line` is the line an addition of `item` with `customizations` belongs to
pub fn same_line(
    identity: LineIdentity,
    line: &LineItem,
    item: &MenuItemRef,
    customizations: Option<&Customizations>,
) -> bool {
    identity.matches(line, item)
        && customizations_equal(line.customizations.as_ref(), customizations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Extra, LineItemStatus};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn custom(removed: &[&str], extras: &[(&str, &str)]) -> Customizations {
        Customizations {
            removed_ingredients: removed.iter().map(|s| s.to_string()).collect(),
            extras: extras.iter().map(|(n, p)| Extra::new(*n, dec(p))).collect(),
        }
    }

    fn line(product_id: i64, name: &str, customizations: Option<Customizations>) -> LineItem {
        LineItem {
            id: "l1".to_string(),
            product_id,
            name: name.to_string(),
            price: dec("3.50"),
            quantity: 1,
            status: LineItemStatus::Pending,
            customizations,
            note: None,
        }
    }

    #[test]
    fn test_both_absent_are_equal() {
        assert!(customizations_equal(None, None));
    }

    #[test]
    fn test_absent_and_present_differ() {
        let c = custom(&[], &[]);
        assert!(!customizations_equal(None, Some(&c)));
        assert!(!customizations_equal(Some(&c), None));
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = custom(&["onion", "tomato"], &[("Cheese", "1"), ("Bacon", "1.5")]);
        let b = custom(&["tomato", "onion"], &[("Bacon", "1.50"), ("Cheese", "1.00")]);
        assert!(customizations_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_different_removed_ingredients() {
        let a = custom(&["onion"], &[]);
        let b = custom(&["tomato"], &[]);
        assert!(!customizations_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_same_extra_name_different_price() {
        let a = custom(&[], &[("Size: Medium", "0.50")]);
        let b = custom(&[], &[("Size: Medium", "0.75")]);
        assert!(!customizations_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_repeated_extra_is_not_the_same_as_one() {
        let double = custom(&[], &[("Extra shot", "0.75"), ("Extra shot", "0.75")]);
        let single = custom(&[], &[("Extra shot", "0.75")]);
        assert!(!customizations_equal(Some(&double), Some(&single)));
        assert!(customizations_equal(Some(&double), Some(&double.clone())));
    }

    #[test]
    fn test_same_line_by_product_id() {
        let l = line(1, "Latte", None);
        let same_id = MenuItemRef::new(1, "Latte (renamed)", dec("3.50"));
        let other_id = MenuItemRef::new(2, "Latte", dec("3.50"));
        assert!(same_line(LineIdentity::ProductId, &l, &same_id, None));
        assert!(!same_line(LineIdentity::ProductId, &l, &other_id, None));
    }

    #[test]
    fn test_same_line_by_name() {
        let l = line(1, "Latte", None);
        let other_id = MenuItemRef::new(2, "Latte", dec("3.50"));
        assert!(same_line(LineIdentity::Name, &l, &other_id, None));
    }

    #[test]
    fn test_same_line_requires_equal_customizations() {
        let medium = custom(&[], &[("Size: Medium", "0.50")]);
        let large = custom(&[], &[("Size: Large", "1.00")]);
        let l = line(1, "Latte", Some(medium.clone()));
        let item = MenuItemRef::new(1, "Latte", dec("3.50"));
        assert!(same_line(LineIdentity::ProductId, &l, &item, Some(&medium)));
        assert!(!same_line(LineIdentity::ProductId, &l, &item, Some(&large)));
        assert!(!same_line(LineIdentity::ProductId, &l, &item, None));
    }
}
