//! Demo binary: runs one service session against the demo restaurant

use anyhow::Context;
use pos_engine::core::seed::demo_engine;
use pos_engine::menu::CustomizationSelection;
use pos_engine::money::format_money;
use pos_engine::payments::{PaymentRequest, SimulatedGateway};
use pos_engine::register::CashCount;
use pos_engine::{Cart, Config, init_logger_with_file};
use rust_decimal::Decimal;
use shared::models::{CutKind, PaymentMethod};
use shared::util::now_millis;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env is optional)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    tracing::info!(environment = %config.environment, "POS engine starting");

    // 2. Engine with demo data and its timers
    let engine = Arc::new(demo_engine(config.clone())?);
    let tasks = engine.start_background_tasks();
    engine.open_register()?;
    let symbol = config.currency_symbol.as_str();
    let started_at = now_millis();

    // 3. Table 4 orders two medium lattes and a burger without onion
    let (latte, burger, americano, horchata) = {
        let menu = engine.menu.read();
        let id = |name: &str| {
            menu.find_by_name(name)
                .map(|item| item.id)
                .with_context(|| format!("{name} missing from the menu"))
        };
        (id("Latte")?, id("Burger")?, id("Americano")?, id("Horchata")?)
    };
    let table_4 = engine
        .floor_plan
        .read()
        .table_by_number(4)
        .map(|t| t.id)
        .context("table 4 missing from the floor plan")?;

    let mut cart = Cart::new();
    let medium = CustomizationSelection::new().choose("Size", "Medium");
    engine.add_to_cart(&mut cart, latte, 1, &medium)?;
    engine.add_to_cart(&mut cart, latte, 1, &medium)?;
    engine.add_to_cart(&mut cart, burger, 1, &CustomizationSelection::new().without("onion"))?;
    tracing::info!(lines = cart.len(), total = %format_money(cart.total(), symbol), "Cart ready");
    let table_order = engine.open_table_order(table_4, Some("Familia Ortiz".into()), cart)?;

    // 4. Kitchen serves it, the guests pay by card
    for ticket in engine.kitchen_queue() {
        tracing::info!(order = %ticket.label, lines = ticket.lines.len(), "Kitchen ticket");
    }
    engine.bump_kitchen_order(table_order)?;

    let gateway = SimulatedGateway::new(config.payment_delay());
    let cancel = CancellationToken::new();
    let total = engine
        .orders
        .read()
        .get(table_order)
        .map(|o| o.total)
        .context("table order vanished")?;
    let request = PaymentRequest::new(table_order, PaymentMethod::Card, total);
    let receipt = engine.pay_order(table_order, &request, &gateway, &cancel).await?;
    tracing::info!(payment_id = %receipt.payment_id, amount = %format_money(receipt.amount, symbol), "Table paid");

    // 5. Counter sale paid in cash
    let mut cart = Cart::new();
    let small = CustomizationSelection::new().choose("Size", "Small");
    engine.add_to_cart(&mut cart, americano, 2, &small)?;
    engine.add_to_cart(&mut cart, horchata, 1, &CustomizationSelection::new())?;
    let counter_total = cart.total();
    let counter_order = engine.counter_checkout(Some("Luis".into()), cart)?;
    engine.advance_counter_order(counter_order)?;
    engine.advance_counter_order(counter_order)?;
    let request = PaymentRequest::cash(counter_order, counter_total, Decimal::new(1000, 2));
    let receipt = engine.pay_order(counter_order, &request, &gateway, &cancel).await?;
    tracing::info!(change = %format_money(receipt.change, symbol), "Counter order paid");

    // 6. Drawer activity and the stock used
    engine.cash_movement(Decimal::new(2000, 2), "Tortilla supplier", false)?;
    let milk = engine
        .inventory
        .read()
        .search("milk")
        .first()
        .map(|item| item.id)
        .context("milk missing from inventory")?;
    engine.consume_stock(milk, Decimal::new(5, 1), "two lattes")?;

    // 7. Reports and the end-of-day cut
    let report = engine.sales_report(started_at, now_millis() + 1)?;
    let export = engine.export_report(&report, &cancel).await?;
    tracing::info!(file = %export.file_name, checksum = %export.checksum, "Sales report saved");

    let mut declared = CashCount::default();
    for (cents, count) in [(10000, 4), (5000, 1), (2000, 1), (1000, 1), (500, 1), (200, 1), (50, 1)] {
        declared.set(Decimal::new(cents, 2), count);
    }
    let cut = engine.cut_register(CutKind::Final, declared, false)?;
    tracing::info!(
        declared = %format_money(cut.result.total_amount, symbol),
        expected = ?cut.result.expected_cash,
        difference = ?cut.result.difference,
        orders_closed = cut.orders_closed,
        "Day closed"
    );

    let unread = engine.notifications.read().unread_count();
    tracing::info!(unread, "Notifications pending");

    // 8. Stop timers
    tasks.shutdown().await;
    tracing::info!("POS engine stopped");
    Ok(())
}
