//! Demo data
//!
//! A small cafe-restaurant: two floors, a short menu, some stock and a
//! four-person crew. Used by the demo binary and the integration tests.

use super::{Config, PosEngine};
use rust_decimal::Decimal;
use shared::error::AppResult;
use shared::models::{
    CustomizationGroup, CustomizationOption, MenuItemCreate, Position, StaffCreate, StaffRole,
    StockItemCreate, TableCreate, TableShape,
};

fn option(name: &str, cents: i64) -> CustomizationOption {
    CustomizationOption {
        name: name.to_string(),
        price: Decimal::new(cents, 2),
    }
}

fn group(name: &str, required: bool, multi_select: bool, options: Vec<CustomizationOption>) -> CustomizationGroup {
    CustomizationGroup {
        name: name.to_string(),
        required,
        multi_select,
        options,
    }
}

fn dish(
    name: &str,
    category_id: i64,
    cents: i64,
    ingredients: &[&str],
    customization_groups: Vec<CustomizationGroup>,
) -> MenuItemCreate {
    MenuItemCreate {
        name: name.to_string(),
        category_id,
        base_price: Decimal::new(cents, 2),
        description: None,
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        customization_groups,
    }
}

fn stock(name: &str, unit: &str, quantity: i64, min_level: i64, cost_cents: i64) -> StockItemCreate {
    StockItemCreate {
        name: name.to_string(),
        unit: unit.to_string(),
        quantity: Decimal::from(quantity),
        min_level: Decimal::from(min_level),
        cost_per_unit: Decimal::new(cost_cents, 2),
    }
}

fn seed_menu(engine: &PosEngine) -> AppResult<()> {
    let mut menu = engine.menu.write();
    let drinks = menu.add_category("Drinks")?;
    let mains = menu.add_category("Mains")?;
    let desserts = menu.add_category("Desserts")?;

    let size = group(
        "Size",
        true,
        false,
        vec![option("Small", 0), option("Medium", 50), option("Large", 100)],
    );
    let coffee_extras = group(
        "Extras",
        false,
        true,
        vec![option("Extra shot", 75), option("Vanilla", 40)],
    );
    menu.add_item(dish("Latte", drinks, 350, &["foam"], vec![size.clone(), coffee_extras]))?;
    menu.add_item(dish("Americano", drinks, 250, &[], vec![size]))?;
    menu.add_item(dish("Horchata", drinks, 275, &["cinnamon"], vec![]))?;

    let burger_extras = group(
        "Extras",
        false,
        true,
        vec![option("Bacon", 150), option("Cheese", 100)],
    );
    menu.add_item(dish(
        "Burger",
        mains,
        900,
        &["onion", "pickles", "tomato"],
        vec![burger_extras],
    ))?;
    menu.add_item(dish(
        "Tacos al pastor",
        mains,
        700,
        &["onion", "cilantro", "pineapple"],
        vec![],
    ))?;
    menu.add_item(dish("Flan", desserts, 325, &["caramel"], vec![]))?;
    Ok(())
}

fn seed_floor_plan(engine: &PosEngine) -> AppResult<()> {
    let mut plan = engine.floor_plan.write();
    let main = plan.add_floor("Main")?;
    let terrace = plan.add_floor("Terrace")?;

    let layout = [
        (1, 2, TableShape::Square, 80, 80, main),
        (2, 2, TableShape::Square, 240, 80, main),
        (3, 4, TableShape::Round, 80, 260, main),
        (4, 6, TableShape::Rectangle, 300, 260, main),
        (5, 4, TableShape::Round, 100, 100, terrace),
        (6, 8, TableShape::Rectangle, 320, 100, terrace),
    ];
    for (number, capacity, shape, x, y, floor_id) in layout {
        plan.add_table(TableCreate {
            number,
            capacity,
            shape,
            position: Position::new(x, y),
            floor_id,
        })?;
    }
    Ok(())
}

fn seed_inventory(engine: &PosEngine) -> AppResult<()> {
    let mut inventory = engine.inventory.write();
    inventory.add_item(stock("Coffee beans", "kg", 5, 1, 1800))?;
    inventory.add_item(stock("Milk", "l", 12, 4, 110))?;
    inventory.add_item(stock("Corn tortillas", "pcs", 200, 50, 5))?;
    inventory.add_item(stock("Beef", "kg", 6, 2, 1240))?;
    Ok(())
}

fn seed_staff(engine: &PosEngine) -> AppResult<()> {
    let mut staff = engine.staff.write();
    let crew = [
        ("Ana López", StaffRole::Waiter, "ana@cafe.example"),
        ("Beto Ruiz", StaffRole::Cook, "beto@cafe.example"),
        ("Carla Méndez", StaffRole::Cashier, "carla@cafe.example"),
        ("Diego Soto", StaffRole::Manager, "diego@cafe.example"),
    ];
    for (name, role, email) in crew {
        staff.hire(StaffCreate {
            name: name.to_string(),
            role,
            email: email.to_string(),
            phone: None,
        })?;
    }
    Ok(())
}

/// Engine pre-loaded with demo data
pub fn demo_engine(config: Config) -> AppResult<PosEngine> {
    let engine = PosEngine::new(config);
    seed_menu(&engine)?;
    seed_floor_plan(&engine)?;
    seed_inventory(&engine)?;
    seed_staff(&engine)?;
    tracing::info!(
        items = engine.menu.read().items().len(),
        tables = engine.floor_plan.read().tables().len(),
        "Demo data loaded"
    );
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_engine_contents() {
        let engine = demo_engine(Config::default()).unwrap();
        assert_eq!(engine.menu.read().categories().len(), 3);
        assert!(engine.menu.read().find_by_name("Latte").is_some());
        assert_eq!(engine.floor_plan.read().tables().len(), 6);
        assert_eq!(engine.floor_plan.read().floors().len(), 2);
        assert!(engine.inventory.read().low_stock().is_empty());
        assert_eq!(engine.staff.read().active().len(), 4);
        assert!(engine.register.read().is_none());
    }
}
