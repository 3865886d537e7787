//! End-to-end flows through the engine facade, exercising the ledger and all
//! three workflows together the way a consuming UI layer would.

use chrono::Utc;

use stockledger_engine::Engine;
use stockledger_fulfillment::{OrderItem, ReservationOutcome, SalesOrderStatus};
use stockledger_ledger::{MovementKind, MovementRef};
use stockledger_replenishment::{PurchaseItem, PurchaseOrderStatus};
use stockledger_transfer::TransferStatus;

fn engine() -> Engine {
    stockledger_observability::init_for_tests();
    Engine::in_memory()
}

#[test]
fn reserve_then_ship_full_cycle() {
    let engine = engine();
    let product = stockledger_core::ProductId::new();
    let warehouse = stockledger_core::WarehouseId::new();
    engine
        .adjust_stock(product, warehouse, 10, Utc::now())
        .unwrap();

    let mut order = engine.draft_order(
        "customer-7",
        vec![OrderItem {
            product_id: product,
            warehouse_id: warehouse,
            quantity: 4,
        }],
    );

    let outcome = engine.submit_order(&mut order, Utc::now()).unwrap();
    assert!(matches!(outcome, ReservationOutcome::Reserved(_)));
    assert_eq!(order.status(), SalesOrderStatus::Reserved);
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 6);

    engine.ship_order(&mut order, Utc::now()).unwrap();
    assert_eq!(order.status(), SalesOrderStatus::Shipped);
    // Shipping confirms the hold; it deducts nothing further.
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 6);

    let movements = engine
        .movements_for(&MovementRef::SalesOrder(order.id()))
        .unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].kind, MovementKind::Reservation);
    assert_eq!(movements[1].kind, MovementKind::Shipment);
}

#[test]
fn backordered_order_retries_after_replenishment() {
    let mut engine = engine();
    let product = stockledger_core::ProductId::new();
    let warehouse = stockledger_core::WarehouseId::new();
    engine.set_default_warehouse(warehouse);
    engine
        .adjust_stock(product, warehouse, 2, Utc::now())
        .unwrap();

    let mut order = engine.draft_order(
        "customer-3",
        vec![OrderItem {
            product_id: product,
            warehouse_id: warehouse,
            quantity: 5,
        }],
    );

    let outcome = engine.submit_order(&mut order, Utc::now()).unwrap();
    match outcome {
        ReservationOutcome::Backordered(shortage) => {
            assert_eq!(shortage.requested, 5);
            assert_eq!(shortage.available, 2);
        }
        other => panic!("expected backorder, got {other:?}"),
    }
    assert_eq!(order.status(), SalesOrderStatus::Backordered);
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 2);

    let mut po = engine
        .submit_purchase(
            "supplier-1",
            vec![PurchaseItem {
                product_id: product,
                quantity: 10,
                unit_cost: 450,
            }],
        )
        .unwrap();
    let receipt = engine.receive_purchase(&mut po, Utc::now()).unwrap();
    assert!(receipt.is_complete());
    assert_eq!(po.status(), PurchaseOrderStatus::Received);
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 12);

    let outcome = engine.submit_order(&mut order, Utc::now()).unwrap();
    assert!(matches!(outcome, ReservationOutcome::Reserved(_)));
    assert_eq!(order.status(), SalesOrderStatus::Reserved);
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 7);
}

#[test]
fn cancelling_a_reserved_order_releases_the_hold() {
    let engine = engine();
    let product = stockledger_core::ProductId::new();
    let warehouse = stockledger_core::WarehouseId::new();
    engine
        .adjust_stock(product, warehouse, 6, Utc::now())
        .unwrap();

    let mut order = engine.draft_order(
        "customer-9",
        vec![OrderItem {
            product_id: product,
            warehouse_id: warehouse,
            quantity: 6,
        }],
    );
    engine.submit_order(&mut order, Utc::now()).unwrap();
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 0);

    engine.cancel_order(&mut order, Utc::now()).unwrap();
    assert_eq!(order.status(), SalesOrderStatus::Cancelled);
    assert_eq!(engine.quantity(product, warehouse).unwrap(), 6);

    let movements = engine
        .movements_for(&MovementRef::SalesOrder(order.id()))
        .unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[1].kind, MovementKind::ReservationRelease);
}

#[test]
fn receipt_without_any_destination_fails_per_line() {
    let engine = engine();
    let product = stockledger_core::ProductId::new();

    // No stock anywhere and no default warehouse configured.
    let mut po = engine
        .submit_purchase(
            "supplier-2",
            vec![PurchaseItem {
                product_id: product,
                quantity: 3,
                unit_cost: 120,
            }],
        )
        .unwrap();
    let outcome = engine.receive_purchase(&mut po, Utc::now()).unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0].error,
        stockledger_core::LedgerError::NoDestinationWarehouse(p) if p == product
    ));
    assert_eq!(po.status(), PurchaseOrderStatus::Ordered);
    assert!(
        engine
            .movements_for(&MovementRef::PurchaseOrder(po.id()))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn transfer_round_trip_between_warehouses() {
    let engine = engine();
    let product = stockledger_core::ProductId::new();
    let w1 = stockledger_core::WarehouseId::new();
    let w2 = stockledger_core::WarehouseId::new();
    engine.adjust_stock(product, w1, 9, Utc::now()).unwrap();

    let mut transfer = engine.create_transfer(product, 9, w1, w2).unwrap();
    engine.dispatch_transfer(&mut transfer, Utc::now()).unwrap();
    assert_eq!(transfer.status(), TransferStatus::InTransit);
    assert_eq!(engine.quantity(product, w1).unwrap(), 0);
    assert_eq!(engine.quantity(product, w2).unwrap(), 0);

    engine.complete_transfer(&mut transfer, Utc::now()).unwrap();
    assert_eq!(transfer.status(), TransferStatus::Received);
    assert_eq!(engine.quantity(product, w2).unwrap(), 9);
}

#[test]
fn journal_totals_match_store_across_mixed_activity() {
    let mut engine = engine();
    let product = stockledger_core::ProductId::new();
    let w1 = stockledger_core::WarehouseId::new();
    let w2 = stockledger_core::WarehouseId::new();
    engine.set_default_warehouse(w1);

    let mut po = engine
        .submit_purchase(
            "supplier-5",
            vec![PurchaseItem {
                product_id: product,
                quantity: 20,
                unit_cost: 300,
            }],
        )
        .unwrap();
    engine.receive_purchase(&mut po, Utc::now()).unwrap();

    let mut transfer = engine.create_transfer(product, 8, w1, w2).unwrap();
    engine.dispatch_transfer(&mut transfer, Utc::now()).unwrap();
    engine.complete_transfer(&mut transfer, Utc::now()).unwrap();

    let mut order = engine.draft_order(
        "customer-1",
        vec![OrderItem {
            product_id: product,
            warehouse_id: w2,
            quantity: 5,
        }],
    );
    engine.submit_order(&mut order, Utc::now()).unwrap();
    engine.ship_order(&mut order, Utc::now()).unwrap();

    engine.adjust_stock(product, w1, -2, Utc::now()).unwrap();

    let journal_total: i64 = engine
        .product_history(product)
        .unwrap()
        .iter()
        .map(|record| record.quantity)
        .sum();
    let store_total =
        engine.quantity(product, w1).unwrap() + engine.quantity(product, w2).unwrap();
    assert_eq!(store_total, journal_total);
    assert_eq!(store_total, 13);

    let low = engine.low_stock(5).unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].0.warehouse_id, w2);
    assert_eq!(low[0].1, 3);
}
