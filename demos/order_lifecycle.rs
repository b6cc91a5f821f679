//! Order Lifecycle
//!
//! This demo tracks orders across three states and moves them with
//! validated transitions.
//!
//! Key concepts:
//! - Order states (draft -> paid -> shipped), each holding many orders
//! - Item type rules rejecting malformed orders before they are tracked
//! - Transition parameters passing the payment reference to the paid state
//! - Dry runs previewing a transition without committing it
//!
//! Run with: cargo run --example order_lifecycle

use serde_json::{json, Value};
use tracking_state_machine::core::{Attributes, Item, Parameters, TransitionParameter, ValidationResult};
use tracking_state_machine::state::{MemoryState, Staged, TrackingState};
use tracking_state_machine::{item_type, StateMachineBuilder, TrackingError};

// Source-side transition logic
fn pay(draft: &MemoryState, order: Item) -> Staged<'_> {
    let total = order.get_as::<f64>("total").unwrap_or(0.0);
    if order.get_as::<Vec<String>>("items").map_or(true, |items| items.is_empty()) {
        return Staged::failed("Cannot pay for an empty order");
    }

    let removal = draft.stage_removal(&order);
    if !removal.succeeded() {
        return removal;
    }
    let id = order.get_as::<u64>("id").unwrap_or_default();
    let reference = format!("TXN-{id:06}");
    println!("  [Payment] Authorised ${total:.2} as {reference}");

    Staged::new(ValidationResult::success().with_parameter("reference", json!(reference)))
        .on_commit(move || removal.commit())
}

fn ship(paid: &MemoryState, order: Item) -> Staged<'_> {
    if order.get("address").is_none() {
        return Staged::failed("Missing shipping address");
    }
    paid.stage_removal(&order)
}

fn revenue(paid: &MemoryState, _args: Parameters) -> Result<Value, TrackingError> {
    let total: f64 = paid
        .items()
        .iter()
        .filter_map(|order| order.get_as::<f64>("total"))
        .sum();
    Ok(json!(total))
}

fn order_attrs(id: u64, total: f64, items: &[&str]) -> Attributes {
    Attributes::from_json(json!({
        "id": id,
        "total": total,
        "items": items,
        "address": "123 Main St",
    }))
}

fn main() -> Result<(), TrackingError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Order Lifecycle ===\n");

    let draft_order = item_type! {
        Order
        required: [id, address]
        rules: {
            "total is positive" => |item| item.get_as::<f64>("total").is_some_and(|t| t > 0.0),
        }
    };
    let paid_order = item_type! {
        PaidOrder
        required: [id, reference]
    };

    let mut machine = StateMachineBuilder::new()
        .state(MemoryState::new("draft", draft_order, "id").with_transition("pay", pay))
        .state(
            MemoryState::new("paid", paid_order.clone(), "id")
                .with_transition("ship", ship)
                .with_action("revenue", revenue),
        )
        .state(MemoryState::new("shipped", paid_order, "id"))
        .transition("pay", "draft", "paid")
        .transition("ship", "paid", "shipped")
        .action("revenue", "paid")
        .build()?;

    println!("States: draft -> paid -> shipped\n");

    let draft = machine
        .state("draft")
        .ok_or_else(|| TrackingError::StateValidation("State draft does not exist.".into()))?;
    draft.track(order_attrs(1, 149.99, &["Book", "Pen"]), false)?;
    draft.track(order_attrs(2, 20.0, &[]), false)?;
    if let Err(e) = draft.track(order_attrs(3, -5.0, &["Lamp"]), false) {
        println!("Rejected order 3: {e}");
    }
    println!("Draft orders: {}\n", draft.quantity(None));

    let paid_attrs = |id: u64, total: f64, items: &[&str]| {
        order_attrs(id, total, items)
            .with_parameter("reference", TransitionParameter::new("reference"))
    };

    println!("Step 1: Preview payment for order 1");
    machine.transition(
        "pay",
        order_attrs(1, 149.99, &["Book", "Pen"]),
        paid_attrs(1, 149.99, &["Book", "Pen"]),
        true,
    )?;
    println!(
        "  Preview passed; draft still holds {} orders\n",
        machine.state("draft").map_or(0, |s| s.quantity(None))
    );

    println!("Step 2: Pay orders");
    for (id, total, items) in [(1, 149.99, vec!["Book", "Pen"]), (2, 20.0, vec![])] {
        let (from, to) = (order_attrs(id, total, &items), paid_attrs(id, total, &items));
        match machine.transition("pay", from, to, false) {
            Ok(_) => println!("  Order {id} paid"),
            Err(e) => println!("  Order {id} not paid: {e}"),
        }
    }
    println!();

    let revenue = machine.action("revenue", Parameters::new())?.call()?;
    println!("Revenue held in paid: ${revenue}\n");

    println!("Step 3: Ship order 1");
    let shipped = order_attrs(1, 149.99, &["Book", "Pen"]).with("reference", json!("TXN-000001"));
    machine.transition("ship", shipped.clone(), shipped, false)?;

    if let Some(exported) = machine.state("shipped").and_then(|s| s.get(&json!(1))) {
        println!("  Shipped: {:?}\n", exported.as_one());
    }

    for record in machine.history().records() {
        println!("History: {} ({} -> {})", record.transition, record.from, record.to);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
