//! Cart aggregation through the public API, driven from the demo menu

use pos_engine::cart::{AddOutcome, QuantityOutcome};
use pos_engine::core::seed::demo_engine;
use pos_engine::menu::CustomizationSelection;
use pos_engine::{Cart, Config};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn test_latte_sizes_merge_and_split() {
    let engine = demo_engine(Config::default()).unwrap();
    let latte = engine.menu.read().find_by_name("Latte").unwrap().id;
    let medium = CustomizationSelection::new().choose("Size", "Medium");
    let large = CustomizationSelection::new().choose("Size", "Large");
    let mut cart = Cart::new();

    let first = engine.add_to_cart(&mut cart, latte, 1, &medium).unwrap();
    assert!(matches!(first, AddOutcome::Appended { .. }));
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines()[0].price, dec("4.00"));
    assert_eq!(cart.total(), dec("4.00"));

    let second = engine.add_to_cart(&mut cart, latte, 1, &medium).unwrap();
    assert_eq!(
        second,
        AddOutcome::Merged {
            line_id: first.line_id().to_string(),
            quantity: 2
        }
    );
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total(), dec("8.00"));

    let third = engine.add_to_cart(&mut cart, latte, 1, &large).unwrap();
    assert!(matches!(third, AddOutcome::Appended { .. }));
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.total(), dec("12.50"));

    // Dropping the medium line to zero removes it
    assert_eq!(
        cart.change_quantity(first.line_id(), -2).unwrap(),
        QuantityOutcome::Removed
    );
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total(), dec("4.50"));
    assert!(cart.lines().iter().all(|l| l.quantity > 0));
}

#[test]
fn test_required_size_must_be_chosen() {
    let engine = demo_engine(Config::default()).unwrap();
    let latte = engine.menu.read().find_by_name("Latte").unwrap().id;
    let mut cart = Cart::new();

    let err = engine
        .add_to_cart(&mut cart, latte, 1, &CustomizationSelection::new())
        .unwrap_err();
    assert_eq!(err.message, "Please select an option for Size");
    assert!(cart.is_empty());
}

#[test]
fn test_removed_ingredients_split_lines() {
    let engine = demo_engine(Config::default()).unwrap();
    let burger = engine.menu.read().find_by_name("Burger").unwrap().id;
    let plain = CustomizationSelection::new();
    let no_onion = CustomizationSelection::new().without("onion");
    let no_onion_pickles = CustomizationSelection::new().without("pickles").without("onion");
    let mut cart = Cart::new();

    engine.add_to_cart(&mut cart, burger, 1, &plain).unwrap();
    engine.add_to_cart(&mut cart, burger, 1, &no_onion).unwrap();
    engine.add_to_cart(&mut cart, burger, 1, &no_onion_pickles).unwrap();
    engine.add_to_cart(&mut cart, burger, 2, &plain).unwrap();
    assert_eq!(cart.len(), 3);
    assert_eq!(cart.item_count(), 5);
    assert_eq!(cart.total(), dec("45.00"));
}
