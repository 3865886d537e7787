//! Inventory Ledger & Fulfillment Engine — the internal service boundary.
//!
//! Bundles the ledger with the three workflows behind one front door, wired
//! with the in-memory store and journal. The UI and catalog layers consume
//! this; they never touch the store or journal directly.

use chrono::{DateTime, Utc};

use stockledger_core::{
    LedgerResult, ProductId, PurchaseOrderId, SalesOrderId, TransferId, WarehouseId,
};
use stockledger_fulfillment::{Fulfillment, OrderItem, ReservationOutcome, SalesOrder};
use stockledger_ledger::{
    InMemoryMovementJournal, InMemoryQuantityStore, MovementRecord, MovementRef, StockKey,
    StockLedger,
};
use stockledger_replenishment::{
    PurchaseItem, PurchaseOrder, ReceiptOutcome, Replenishment, StockedOrDefault,
};
use stockledger_transfer::{TransferRequest, Transfers};

pub use stockledger_core as core;
pub use stockledger_fulfillment as fulfillment;
pub use stockledger_ledger as ledger;
pub use stockledger_replenishment as replenishment;
pub use stockledger_transfer as transfer;

/// The engine: one ledger, three workflows.
#[derive(Debug)]
pub struct Engine {
    ledger: StockLedger<InMemoryQuantityStore, InMemoryMovementJournal>,
    default_warehouse: Option<WarehouseId>,
}

impl Engine {
    /// Engine over in-memory storage, with no default receiving warehouse.
    pub fn in_memory() -> Self {
        Self {
            ledger: StockLedger::new(InMemoryQuantityStore::new(), InMemoryMovementJournal::new()),
            default_warehouse: None,
        }
    }

    /// Where goods receipts land when no warehouse already holds the product.
    pub fn set_default_warehouse(&mut self, warehouse_id: WarehouseId) {
        self.default_warehouse = Some(warehouse_id);
    }

    pub fn ledger(&self) -> &StockLedger<InMemoryQuantityStore, InMemoryMovementJournal> {
        &self.ledger
    }

    // --- Quantity store & journal reads ---

    pub fn quantity(&self, product_id: ProductId, warehouse_id: WarehouseId) -> LedgerResult<i64> {
        self.ledger.quantity(product_id, warehouse_id)
    }

    pub fn movements_for(&self, reference: &MovementRef) -> LedgerResult<Vec<MovementRecord>> {
        self.ledger.movements_for(reference)
    }

    pub fn product_history(&self, product_id: ProductId) -> LedgerResult<Vec<MovementRecord>> {
        self.ledger.product_history(product_id)
    }

    pub fn low_stock(&self, threshold: i64) -> LedgerResult<Vec<(StockKey, i64)>> {
        self.ledger.low_stock(threshold)
    }

    /// Manual stock correction with an audit movement.
    pub fn adjust_stock(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<(MovementRecord, i64)> {
        self.ledger.adjust(product_id, warehouse_id, delta, occurred_at)
    }

    // --- Fulfillment ---

    pub fn draft_order(
        &self,
        customer_ref: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> SalesOrder {
        SalesOrder::draft(SalesOrderId::new(), customer_ref, items)
    }

    pub fn submit_order(
        &self,
        order: &mut SalesOrder,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<ReservationOutcome> {
        Fulfillment::new(&self.ledger).submit(order, occurred_at)
    }

    pub fn ship_order(
        &self,
        order: &mut SalesOrder,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        Fulfillment::new(&self.ledger).ship(order, occurred_at)
    }

    pub fn cancel_order(
        &self,
        order: &mut SalesOrder,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        Fulfillment::new(&self.ledger).cancel(order, occurred_at)
    }

    // --- Replenishment ---

    pub fn submit_purchase(
        &self,
        supplier_ref: impl Into<String>,
        items: Vec<PurchaseItem>,
    ) -> LedgerResult<PurchaseOrder> {
        Replenishment::new(&self.ledger).submit(PurchaseOrderId::new(), supplier_ref, items)
    }

    pub fn receive_purchase(
        &self,
        order: &mut PurchaseOrder,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<ReceiptOutcome> {
        let resolver = StockedOrDefault::new(self.ledger.store(), self.default_warehouse);
        Replenishment::new(&self.ledger).receive(order, &resolver, occurred_at)
    }

    pub fn cancel_purchase(&self, order: &mut PurchaseOrder) -> LedgerResult<()> {
        Replenishment::new(&self.ledger).cancel(order)
    }

    // --- Transfers ---

    pub fn create_transfer(
        &self,
        product_id: ProductId,
        quantity: i64,
        from_warehouse_id: WarehouseId,
        to_warehouse_id: WarehouseId,
    ) -> LedgerResult<TransferRequest> {
        Transfers::new(&self.ledger).create(
            TransferId::new(),
            product_id,
            quantity,
            from_warehouse_id,
            to_warehouse_id,
        )
    }

    pub fn dispatch_transfer(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        Transfers::new(&self.ledger).dispatch(transfer, occurred_at)
    }

    pub fn complete_transfer(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        Transfers::new(&self.ledger).complete(transfer, occurred_at)
    }

    pub fn cancel_transfer(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        Transfers::new(&self.ledger).cancel(transfer, occurred_at)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::in_memory()
    }
}
