//! Reservation manager: turns requested items into a confirmed hold or a
//! backorder, with the quantity store as the arbiter.

use chrono::{DateTime, Utc};

use stockledger_core::{LedgerError, LedgerResult, ProductId, SalesOrderId, WarehouseId};
use stockledger_ledger::{MovementJournal, MovementRecord, Posting, QuantityStore, StockLedger};

use crate::order::OrderItem;

/// The first item that could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortage {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub requested: i64,
    pub available: i64,
}

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// Every item was deducted; one Reservation movement per item.
    Reserved(Vec<MovementRecord>),
    /// At least one item was short. No quantity was deducted for any item.
    Backordered(Shortage),
}

/// Read-then-conditionally-write helper invoked by the fulfillment workflow.
#[derive(Debug)]
pub struct ReservationManager<'a, S, J> {
    ledger: &'a StockLedger<S, J>,
}

impl<'a, S: QuantityStore, J: MovementJournal> ReservationManager<'a, S, J> {
    pub fn new(ledger: &'a StockLedger<S, J>) -> Self {
        Self { ledger }
    }

    /// Attempt an all-or-nothing hold of every item.
    ///
    /// The batched store adjustment is itself the atomic check; there is no
    /// separate read-then-deduct window, and a shortage leaves nothing to
    /// roll back.
    pub fn try_reserve(
        &self,
        order_id: SalesOrderId,
        items: &[OrderItem],
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<ReservationOutcome> {
        let postings: Vec<Posting> = items
            .iter()
            .map(|item| {
                Posting::reservation(
                    item.product_id,
                    item.warehouse_id,
                    item.quantity,
                    order_id,
                    occurred_at,
                )
            })
            .collect();

        match self.ledger.post(postings) {
            Ok(records) => Ok(ReservationOutcome::Reserved(records)),
            Err(LedgerError::InsufficientStock {
                product_id,
                warehouse_id,
                requested,
                available,
            }) => Ok(ReservationOutcome::Backordered(Shortage {
                product_id,
                warehouse_id,
                requested,
                available,
            })),
            Err(other) => Err(other),
        }
    }
}
