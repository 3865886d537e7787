//! Posting facade: the single write path into store and journal.

use chrono::{DateTime, Utc};

use stockledger_core::{
    AdjustmentId, LedgerError, LedgerResult, ProductId, PurchaseOrderId, SalesOrderId, TransferId,
    WarehouseId,
};

use crate::journal::{
    MovementJournal, MovementKind, MovementRecord, MovementRef, MovementStatus, NewMovement,
};
use crate::store::{QuantityStore, StockKey};

/// One quantity change plus the movement that explains it.
///
/// Constructed through the per-kind constructors so sign conventions and
/// source/destination attribution live in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    key: StockKey,
    delta: i64,
    kind: MovementKind,
    reference: MovementRef,
    counterparty: Option<WarehouseId>,
    status: Option<MovementStatus>,
    occurred_at: DateTime<Utc>,
}

impl Posting {
    fn new(
        key: StockKey,
        delta: i64,
        kind: MovementKind,
        reference: MovementRef,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            delta,
            kind,
            reference,
            counterparty: None,
            status: None,
            occurred_at,
        }
    }

    /// Stock held against a sales order before shipment.
    pub fn reservation(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: i64,
        order_id: SalesOrderId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, warehouse_id),
            -quantity,
            MovementKind::Reservation,
            MovementRef::SalesOrder(order_id),
            occurred_at,
        )
    }

    /// A cancelled reservation returning held stock.
    pub fn reservation_release(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: i64,
        order_id: SalesOrderId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, warehouse_id),
            quantity,
            MovementKind::ReservationRelease,
            MovementRef::SalesOrder(order_id),
            occurred_at,
        )
    }

    /// Shipment confirmation. Delta 0: stock already left at reservation time;
    /// shipping converts the hold into a permanent exit.
    pub fn shipment(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        order_id: SalesOrderId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, warehouse_id),
            0,
            MovementKind::Shipment,
            MovementRef::SalesOrder(order_id),
            occurred_at,
        )
    }

    /// Purchase-order goods received into a warehouse.
    pub fn receipt(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: i64,
        order_id: PurchaseOrderId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, warehouse_id),
            quantity,
            MovementKind::Receipt,
            MovementRef::PurchaseOrder(order_id),
            occurred_at,
        )
    }

    /// Transfer dispatch: stock leaves the source warehouse.
    pub fn transfer_out(
        product_id: ProductId,
        from: WarehouseId,
        to: WarehouseId,
        quantity: i64,
        transfer_id: TransferId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let mut posting = Self::new(
            StockKey::new(product_id, from),
            -quantity,
            MovementKind::TransferOut,
            MovementRef::Transfer(transfer_id),
            occurred_at,
        );
        posting.counterparty = Some(to);
        posting.status = Some(MovementStatus::InTransit);
        posting
    }

    /// Transfer completion: stock lands at the destination warehouse.
    pub fn transfer_in(
        product_id: ProductId,
        from: WarehouseId,
        to: WarehouseId,
        quantity: i64,
        transfer_id: TransferId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let mut posting = Self::new(
            StockKey::new(product_id, to),
            quantity,
            MovementKind::TransferIn,
            MovementRef::Transfer(transfer_id),
            occurred_at,
        );
        posting.counterparty = Some(from);
        posting.status = Some(MovementStatus::Received);
        posting
    }

    /// Cancelled in-transit transfer: the dispatched quantity returns to the
    /// source warehouse (exact reverse of [`Posting::transfer_out`]).
    pub fn transfer_return(
        product_id: ProductId,
        from: WarehouseId,
        quantity: i64,
        transfer_id: TransferId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, from),
            quantity,
            MovementKind::TransferIn,
            MovementRef::Transfer(transfer_id),
            occurred_at,
        )
    }

    /// Explicit manual correction.
    pub fn adjustment(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i64,
        adjustment_id: AdjustmentId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            StockKey::new(product_id, warehouse_id),
            delta,
            MovementKind::Adjustment,
            MovementRef::Adjustment(adjustment_id),
            occurred_at,
        )
    }

    pub fn key(&self) -> StockKey {
        self.key
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    fn into_movement(self) -> NewMovement {
        // Attribute the mutated warehouse as source on decreases and as
        // destination on increases; the counterparty fills the other side.
        let (source, dest) = if self.delta > 0 {
            (self.counterparty, Some(self.key.warehouse_id))
        } else {
            (Some(self.key.warehouse_id), self.counterparty)
        };
        NewMovement {
            product_id: self.key.product_id,
            quantity: self.delta,
            source_warehouse_id: source,
            dest_warehouse_id: dest,
            kind: self.kind,
            reference: self.reference,
            status: self.status,
            occurred_at: self.occurred_at,
        }
    }
}

/// The ledger: a quantity store and a movement journal that only change
/// together.
///
/// Workflows never write the store or journal directly; they build postings
/// and hand them here. `post` adjusts all quantities first (all-or-nothing)
/// and appends the paired movements only once the adjustment committed.
#[derive(Debug)]
pub struct StockLedger<S, J> {
    store: S,
    journal: J,
}

impl<S: QuantityStore, J: MovementJournal> StockLedger<S, J> {
    pub fn new(store: S, journal: J) -> Self {
        Self { store, journal }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// Commit a batch of postings as one atomic unit.
    ///
    /// Either every quantity adjustment and every paired movement takes
    /// effect, or none do. The movements go to the journal as one batch; if
    /// that batch fails, the already-applied adjustment is reversed so no
    /// quantity change survives without its movement.
    pub fn post(&self, postings: Vec<Posting>) -> LedgerResult<Vec<MovementRecord>> {
        if postings.is_empty() {
            return Ok(vec![]);
        }

        let deltas: Vec<(StockKey, i64)> =
            postings.iter().map(|p| (p.key(), p.delta())).collect();
        self.store.adjust_all(&deltas)?;

        let movements: Vec<NewMovement> =
            postings.into_iter().map(Posting::into_movement).collect();
        match self.journal.append_all(movements) {
            Ok(committed) => {
                tracing::debug!(movements = committed.len(), "postings committed");
                Ok(committed)
            }
            Err(err) => {
                self.reverse(&deltas, &err);
                Err(err)
            }
        }
    }

    /// Undo an applied adjustment whose paired journal append failed. The
    /// reversal restores a state the store already held, so it cannot trip
    /// the non-negativity check; only a storage fault can make it fail.
    fn reverse(&self, deltas: &[(StockKey, i64)], cause: &LedgerError) {
        let reversal: Vec<(StockKey, i64)> =
            deltas.iter().map(|(key, delta)| (*key, -delta)).collect();
        if let Err(rollback) = self.store.adjust_all(&reversal) {
            tracing::error!(%cause, %rollback, "stock reversal after journal failure also failed");
        }
    }

    /// Manual stock correction with an audit movement.
    pub fn adjust(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<(MovementRecord, i64)> {
        if delta == 0 {
            return Err(LedgerError::validation("delta cannot be zero"));
        }
        let adjustment_id = AdjustmentId::new();
        let key = StockKey::new(product_id, warehouse_id);
        let results = self.store.adjust_all(&[(key, delta)])?;
        let new_quantity = results.into_iter().next().map(|(_, q)| q).unwrap_or(0);
        let movement =
            Posting::adjustment(product_id, warehouse_id, delta, adjustment_id, occurred_at)
                .into_movement();
        match self.journal.append(movement) {
            Ok(record) => {
                tracing::info!(%product_id, %warehouse_id, delta, new_quantity, "manual stock adjustment");
                Ok((record, new_quantity))
            }
            Err(err) => {
                self.reverse(&[(key, delta)], &err);
                Err(err)
            }
        }
    }

    /// Snapshot read of one stock level.
    pub fn quantity(&self, product_id: ProductId, warehouse_id: WarehouseId) -> LedgerResult<i64> {
        self.store.read(StockKey::new(product_id, warehouse_id))
    }

    /// Audit query: movements caused by one originating document.
    pub fn movements_for(&self, reference: &MovementRef) -> LedgerResult<Vec<MovementRecord>> {
        self.journal.list_by_reference(reference)
    }

    /// Audit query: full movement history of one product.
    pub fn product_history(&self, product_id: ProductId) -> LedgerResult<Vec<MovementRecord>> {
        self.journal.list_for_product(product_id)
    }

    /// Stock levels strictly below `threshold`. Levels at zero are absent
    /// from the store and therefore not reported.
    pub fn low_stock(&self, threshold: i64) -> LedgerResult<Vec<(StockKey, i64)>> {
        let mut rows = self.store.snapshot()?;
        rows.retain(|(_, qty)| *qty < threshold);
        Ok(rows)
    }
}
