//! Movement journal: append-only log of every quantity-changing event.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{
    AdjustmentId, LedgerError, LedgerResult, MovementId, ProductId, PurchaseOrderId, SalesOrderId,
    TransferId, WarehouseId,
};

/// What kind of quantity change a movement explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Receipt,
    Reservation,
    ReservationRelease,
    Shipment,
    TransferOut,
    TransferIn,
    Adjustment,
}

/// Lifecycle status for movements that have one (transfers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStatus {
    Pending,
    InTransit,
    Received,
}

/// The originating document of a movement.
///
/// Every movement traces back to exactly one sales order, purchase order,
/// transfer request, or explicit manual adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementRef {
    SalesOrder(SalesOrderId),
    PurchaseOrder(PurchaseOrderId),
    Transfer(TransferId),
    Adjustment(AdjustmentId),
}

/// A movement ready to be appended (not yet assigned an id or sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: ProductId,
    /// Signed: positive = increase, negative = decrease. Shipments carry 0
    /// because stock already left at reservation time.
    pub quantity: i64,
    pub source_warehouse_id: Option<WarehouseId>,
    pub dest_warehouse_id: Option<WarehouseId>,
    pub kind: MovementKind,
    pub reference: MovementRef,
    pub status: Option<MovementStatus>,
    pub occurred_at: DateTime<Utc>,
}

/// A committed movement record. Never updated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    /// Monotonically increasing position in the journal (assigned on append).
    pub sequence: u64,
    pub product_id: ProductId,
    pub quantity: i64,
    pub source_warehouse_id: Option<WarehouseId>,
    pub dest_warehouse_id: Option<WarehouseId>,
    pub kind: MovementKind,
    pub reference: MovementRef,
    pub status: Option<MovementStatus>,
    pub occurred_at: DateTime<Utc>,
}

/// Append-only audit trail of quantity changes.
pub trait MovementJournal: Send + Sync {
    /// Durably record a batch of movements as one unit: either every record
    /// is appended or none are. Assigns ids and sequences.
    fn append_all(&self, movements: Vec<NewMovement>) -> LedgerResult<Vec<MovementRecord>>;

    /// All movements caused by one originating document, ordered by
    /// `occurred_at` ascending (sequence as tiebreak).
    fn list_by_reference(&self, reference: &MovementRef) -> LedgerResult<Vec<MovementRecord>>;

    /// All movements touching one product, same ordering. Audit-view query.
    fn list_for_product(&self, product_id: ProductId) -> LedgerResult<Vec<MovementRecord>>;

    /// Durably record one movement.
    fn append(&self, movement: NewMovement) -> LedgerResult<MovementRecord> {
        self.append_all(vec![movement])?
            .pop()
            .ok_or_else(|| LedgerError::storage("journal appended no record"))
    }
}

#[derive(Debug, Default)]
struct JournalInner {
    next_sequence: u64,
    records: Vec<MovementRecord>,
}

/// In-memory append-only journal.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementJournal {
    inner: RwLock<JournalInner>,
}

impl InMemoryMovementJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted<F>(&self, keep: F) -> LedgerResult<Vec<MovementRecord>>
    where
        F: Fn(&MovementRecord) -> bool,
    {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::storage("movement journal lock poisoned"))?;
        let mut out: Vec<MovementRecord> =
            inner.records.iter().filter(|r| keep(r)).cloned().collect();
        out.sort_by_key(|r| (r.occurred_at, r.sequence));
        Ok(out)
    }
}

impl MovementJournal for InMemoryMovementJournal {
    fn append_all(&self, movements: Vec<NewMovement>) -> LedgerResult<Vec<MovementRecord>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::storage("movement journal lock poisoned"))?;
        let mut appended = Vec::with_capacity(movements.len());
        for movement in movements {
            inner.next_sequence += 1;
            let record = MovementRecord {
                id: MovementId::new(),
                sequence: inner.next_sequence,
                product_id: movement.product_id,
                quantity: movement.quantity,
                source_warehouse_id: movement.source_warehouse_id,
                dest_warehouse_id: movement.dest_warehouse_id,
                kind: movement.kind,
                reference: movement.reference,
                status: movement.status,
                occurred_at: movement.occurred_at,
            };
            inner.records.push(record.clone());
            appended.push(record);
        }
        Ok(appended)
    }

    fn list_by_reference(&self, reference: &MovementRef) -> LedgerResult<Vec<MovementRecord>> {
        self.collect_sorted(|r| r.reference == *reference)
    }

    fn list_for_product(&self, product_id: ProductId) -> LedgerResult<Vec<MovementRecord>> {
        self.collect_sorted(|r| r.product_id == product_id)
    }
}
