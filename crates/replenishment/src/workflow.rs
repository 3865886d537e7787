//! Replenishment workflow: the state machine governing a purchase order from
//! submission through goods receipt.

use chrono::{DateTime, Utc};

use stockledger_core::{LedgerError, LedgerResult, ProductId, PurchaseOrderId, WarehouseId};
use stockledger_ledger::{MovementJournal, Posting, QuantityStore, StockLedger};

use crate::order::{PurchaseItem, PurchaseOrder, PurchaseOrderStatus};
use crate::resolve::DestinationResolver;

/// One line credited into stock during a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivedLine {
    pub line_no: u32,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

/// One line that failed during a receipt, leaving the order Ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    pub line_no: u32,
    pub error: LedgerError,
}

/// Result of one receipt pass over an order's pending lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOutcome {
    pub received: Vec<ReceivedLine>,
    pub failures: Vec<LineFailure>,
}

impl ReceiptOutcome {
    /// True when every line of the order has been received.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives purchase orders against the ledger.
#[derive(Debug)]
pub struct Replenishment<'a, S, J> {
    ledger: &'a StockLedger<S, J>,
}

impl<'a, S: QuantityStore, J: MovementJournal> Replenishment<'a, S, J> {
    pub fn new(ledger: &'a StockLedger<S, J>) -> Self {
        Self { ledger }
    }

    /// Validate and create a purchase order in Ordered state.
    pub fn submit(
        &self,
        id: PurchaseOrderId,
        supplier_ref: impl Into<String>,
        items: Vec<PurchaseItem>,
    ) -> LedgerResult<PurchaseOrder> {
        let supplier_ref = supplier_ref.into();
        if supplier_ref.trim().is_empty() {
            return Err(LedgerError::validation("supplier reference cannot be empty"));
        }
        if items.is_empty() {
            return Err(LedgerError::validation("purchase order must have at least one item"));
        }
        for item in &items {
            if item.quantity <= 0 {
                return Err(LedgerError::validation("item quantity must be positive"));
            }
        }
        tracing::info!(order_id = %id, lines = items.len(), "purchase order submitted");
        Ok(PurchaseOrder::ordered(id, supplier_ref, items))
    }

    /// Receive pending lines into stock.
    ///
    /// Per-line atomic: each line resolves a destination and commits its
    /// Receipt movement independently; a line with no resolvable destination
    /// fails alone and the order stays Ordered. The status moves to Received
    /// and `received_at` is stamped only once every line has committed.
    /// Already-received lines are skipped, so a retry after a partial receipt
    /// never double-credits.
    pub fn receive(
        &self,
        order: &mut PurchaseOrder,
        resolver: &dyn DestinationResolver,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<ReceiptOutcome> {
        if order.status() != PurchaseOrderStatus::Ordered {
            return Err(LedgerError::transition(format!(
                "cannot receive purchase order in {:?} state",
                order.status()
            )));
        }

        let pending: Vec<(u32, ProductId, i64)> = order
            .lines()
            .iter()
            .filter(|line| !line.is_received())
            .map(|line| (line.line_no, line.product_id, line.quantity))
            .collect();

        let mut outcome = ReceiptOutcome {
            received: Vec::new(),
            failures: Vec::new(),
        };

        for (line_no, product_id, quantity) in pending {
            let destination = match resolver.resolve(product_id) {
                Ok(Some(warehouse_id)) => warehouse_id,
                Ok(None) => {
                    outcome.failures.push(LineFailure {
                        line_no,
                        error: LedgerError::NoDestinationWarehouse(product_id),
                    });
                    continue;
                }
                Err(error) => {
                    outcome.failures.push(LineFailure { line_no, error });
                    continue;
                }
            };

            match self.ledger.post(vec![Posting::receipt(
                product_id,
                destination,
                quantity,
                order.id(),
                occurred_at,
            )]) {
                Ok(_) => {
                    order.mark_line_received(line_no);
                    outcome.received.push(ReceivedLine {
                        line_no,
                        warehouse_id: destination,
                        quantity,
                    });
                }
                Err(error) => outcome.failures.push(LineFailure { line_no, error }),
            }
        }

        if outcome.is_complete() {
            order.set_status(PurchaseOrderStatus::Received);
            order.stamp_received_at(occurred_at);
            tracing::info!(order_id = %order.id(), "purchase order received");
        } else {
            tracing::warn!(
                order_id = %order.id(),
                failed_lines = outcome.failures.len(),
                "purchase order partially received"
            );
        }
        Ok(outcome)
    }

    /// Cancel an order that has not started receiving.
    pub fn cancel(&self, order: &mut PurchaseOrder) -> LedgerResult<()> {
        if order.status() != PurchaseOrderStatus::Ordered {
            return Err(LedgerError::transition(format!(
                "cannot cancel purchase order in {:?} state",
                order.status()
            )));
        }
        if order.has_received_lines() {
            return Err(LedgerError::transition(
                "cannot cancel purchase order with received lines",
            ));
        }
        order.set_status(PurchaseOrderStatus::Cancelled);
        tracing::info!(order_id = %order.id(), "purchase order cancelled");
        Ok(())
    }
}
