//! Fulfillment workflow: the state machine governing a sales order from
//! submission through shipment.

use chrono::{DateTime, Utc};

use stockledger_core::{LedgerError, LedgerResult};
use stockledger_ledger::{MovementJournal, Posting, QuantityStore, StockLedger};

use crate::order::{SalesOrder, SalesOrderStatus};
use crate::reservation::{ReservationManager, ReservationOutcome};

/// Drives sales orders against the ledger.
#[derive(Debug)]
pub struct Fulfillment<'a, S, J> {
    ledger: &'a StockLedger<S, J>,
}

impl<'a, S: QuantityStore, J: MovementJournal> Fulfillment<'a, S, J> {
    pub fn new(ledger: &'a StockLedger<S, J>) -> Self {
        Self { ledger }
    }

    /// Validate and attempt reservation. Moves the order to Reserved or
    /// Backordered. Legal from Draft and from Backordered (the retry hook
    /// after replenishment).
    pub fn submit(
        &self,
        order: &mut SalesOrder,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<ReservationOutcome> {
        if !order.is_submittable() {
            return Err(LedgerError::transition(format!(
                "cannot submit order in {:?} state",
                order.status()
            )));
        }
        if order.customer_ref().trim().is_empty() {
            return Err(LedgerError::validation("customer reference cannot be empty"));
        }
        if order.items().is_empty() {
            return Err(LedgerError::validation("order must have at least one item"));
        }
        for item in order.items() {
            if item.quantity <= 0 {
                return Err(LedgerError::validation("item quantity must be positive"));
            }
        }

        let outcome =
            ReservationManager::new(self.ledger).try_reserve(order.id(), order.items(), occurred_at)?;
        match &outcome {
            ReservationOutcome::Reserved(_) => {
                order.set_status(SalesOrderStatus::Reserved);
                tracing::info!(order_id = %order.id(), "sales order reserved");
            }
            ReservationOutcome::Backordered(shortage) => {
                order.set_status(SalesOrderStatus::Backordered);
                tracing::info!(
                    order_id = %order.id(),
                    product_id = %shortage.product_id,
                    requested = shortage.requested,
                    available = shortage.available,
                    "sales order backordered"
                );
            }
        }
        Ok(outcome)
    }

    /// Confirm departure of a reserved order. Appends one Shipment movement
    /// per item; no further deduction occurs (stock left at reservation time).
    pub fn ship(&self, order: &mut SalesOrder, occurred_at: DateTime<Utc>) -> LedgerResult<()> {
        if order.status() != SalesOrderStatus::Reserved {
            return Err(LedgerError::transition(format!(
                "cannot ship order in {:?} state",
                order.status()
            )));
        }

        let postings: Vec<Posting> = order
            .items()
            .iter()
            .map(|item| {
                Posting::shipment(item.product_id, item.warehouse_id, order.id(), occurred_at)
            })
            .collect();
        self.ledger.post(postings)?;
        order.set_status(SalesOrderStatus::Shipped);
        tracing::info!(order_id = %order.id(), "sales order shipped");
        Ok(())
    }

    /// Cancel an order. Releases held stock if it was reserved; a draft or
    /// backordered order holds nothing and is cancelled directly.
    pub fn cancel(&self, order: &mut SalesOrder, occurred_at: DateTime<Utc>) -> LedgerResult<()> {
        match order.status() {
            SalesOrderStatus::Reserved => {
                let postings: Vec<Posting> = order
                    .items()
                    .iter()
                    .map(|item| {
                        Posting::reservation_release(
                            item.product_id,
                            item.warehouse_id,
                            item.quantity,
                            order.id(),
                            occurred_at,
                        )
                    })
                    .collect();
                self.ledger.post(postings)?;
            }
            SalesOrderStatus::Draft | SalesOrderStatus::Backordered => {}
            SalesOrderStatus::Shipped | SalesOrderStatus::Cancelled => {
                return Err(LedgerError::transition(format!(
                    "cannot cancel order in {:?} state",
                    order.status()
                )));
            }
        }
        order.set_status(SalesOrderStatus::Cancelled);
        tracing::info!(order_id = %order.id(), "sales order cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderItem;
    use stockledger_core::{ProductId, SalesOrderId, WarehouseId};
    use stockledger_ledger::{
        InMemoryMovementJournal, InMemoryQuantityStore, MovementKind, MovementRef,
    };

    fn ledger() -> StockLedger<InMemoryQuantityStore, InMemoryMovementJournal> {
        StockLedger::new(InMemoryQuantityStore::new(), InMemoryMovementJournal::new())
    }

    fn item(product_id: ProductId, warehouse_id: WarehouseId, quantity: i64) -> OrderItem {
        OrderItem {
            product_id,
            warehouse_id,
            quantity,
        }
    }

    #[test]
    fn submit_reserves_when_stock_suffices() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();
        ledger.adjust(product, warehouse, 10, Utc::now()).unwrap();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 4)],
        );
        let outcome = workflow.submit(&mut order, Utc::now()).unwrap();

        assert!(matches!(outcome, ReservationOutcome::Reserved(_)));
        assert_eq!(order.status(), SalesOrderStatus::Reserved);
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 6);
    }

    #[test]
    fn submit_rejects_empty_customer_and_empty_items() {
        let ledger = ledger();
        let workflow = Fulfillment::new(&ledger);

        let mut no_customer = SalesOrder::draft(
            SalesOrderId::new(),
            "  ",
            vec![item(ProductId::new(), WarehouseId::new(), 1)],
        );
        assert!(matches!(
            workflow.submit(&mut no_customer, Utc::now()).unwrap_err(),
            LedgerError::Validation(_)
        ));
        assert_eq!(no_customer.status(), SalesOrderStatus::Draft);

        let mut no_items = SalesOrder::draft(SalesOrderId::new(), "acme", vec![]);
        assert!(matches!(
            workflow.submit(&mut no_items, Utc::now()).unwrap_err(),
            LedgerError::Validation(_)
        ));
    }

    #[test]
    fn backordered_order_can_be_resubmitted_after_restock() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 4)],
        );

        let outcome = workflow.submit(&mut order, Utc::now()).unwrap();
        assert!(matches!(outcome, ReservationOutcome::Backordered(_)));
        assert_eq!(order.status(), SalesOrderStatus::Backordered);

        ledger.adjust(product, warehouse, 10, Utc::now()).unwrap();
        let outcome = workflow.submit(&mut order, Utc::now()).unwrap();
        assert!(matches!(outcome, ReservationOutcome::Reserved(_)));
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 6);
    }

    #[test]
    fn ship_appends_shipments_without_further_deduction() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();
        ledger.adjust(product, warehouse, 10, Utc::now()).unwrap();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 4)],
        );
        workflow.submit(&mut order, Utc::now()).unwrap();
        workflow.ship(&mut order, Utc::now()).unwrap();

        assert_eq!(order.status(), SalesOrderStatus::Shipped);
        // Reservation already took the stock; shipping takes nothing more.
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 6);

        let movements = ledger
            .movements_for(&MovementRef::SalesOrder(order.id()))
            .unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements
            .iter()
            .any(|m| m.kind == MovementKind::Shipment && m.quantity == 0));
    }

    #[test]
    fn shipping_twice_fails_and_appends_nothing() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();
        ledger.adjust(product, warehouse, 5, Utc::now()).unwrap();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 2)],
        );
        workflow.submit(&mut order, Utc::now()).unwrap();
        workflow.ship(&mut order, Utc::now()).unwrap();

        let before = ledger
            .movements_for(&MovementRef::SalesOrder(order.id()))
            .unwrap()
            .len();
        let err = workflow.ship(&mut order, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition(_)));
        let after = ledger
            .movements_for(&MovementRef::SalesOrder(order.id()))
            .unwrap()
            .len();
        assert_eq!(before, after);
    }

    #[test]
    fn cannot_ship_backordered_order() {
        let ledger = ledger();
        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(ProductId::new(), WarehouseId::new(), 2)],
        );
        workflow.submit(&mut order, Utc::now()).unwrap();
        assert_eq!(order.status(), SalesOrderStatus::Backordered);

        let err = workflow.ship(&mut order, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition(_)));
    }

    #[test]
    fn cancel_after_reservation_releases_stock() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();
        ledger.adjust(product, warehouse, 10, Utc::now()).unwrap();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 4)],
        );
        workflow.submit(&mut order, Utc::now()).unwrap();
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 6);

        workflow.cancel(&mut order, Utc::now()).unwrap();
        assert_eq!(order.status(), SalesOrderStatus::Cancelled);
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 10);

        let movements = ledger
            .movements_for(&MovementRef::SalesOrder(order.id()))
            .unwrap();
        assert!(movements
            .iter()
            .any(|m| m.kind == MovementKind::ReservationRelease && m.quantity == 4));
    }

    #[test]
    fn cancel_of_backordered_order_touches_no_stock() {
        let ledger = ledger();
        let product = ProductId::new();
        let warehouse = WarehouseId::new();

        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(product, warehouse, 4)],
        );
        workflow.submit(&mut order, Utc::now()).unwrap();

        workflow.cancel(&mut order, Utc::now()).unwrap();
        assert_eq!(order.status(), SalesOrderStatus::Cancelled);
        assert_eq!(ledger.quantity(product, warehouse).unwrap(), 0);
        // Backorders never held stock, so there is nothing in the journal
        // beyond the (empty) reservation attempt.
        assert!(ledger
            .movements_for(&MovementRef::SalesOrder(order.id()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn cancelled_order_cannot_be_cancelled_again() {
        let ledger = ledger();
        let workflow = Fulfillment::new(&ledger);
        let mut order = SalesOrder::draft(
            SalesOrderId::new(),
            "acme",
            vec![item(ProductId::new(), WarehouseId::new(), 1)],
        );
        workflow.cancel(&mut order, Utc::now()).unwrap();

        let err = workflow.cancel(&mut order, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition(_)));
    }
}
