//! Transfer workflow: two-phase stock relocation between warehouses.

use chrono::{DateTime, Utc};

use stockledger_core::{LedgerError, LedgerResult, ProductId, TransferId, WarehouseId};
use stockledger_ledger::{MovementJournal, Posting, QuantityStore, StockLedger};

use crate::request::{TransferRequest, TransferStatus};

/// Drives transfer requests against the ledger.
#[derive(Debug)]
pub struct Transfers<'a, S, J> {
    ledger: &'a StockLedger<S, J>,
}

impl<'a, S: QuantityStore, J: MovementJournal> Transfers<'a, S, J> {
    pub fn new(ledger: &'a StockLedger<S, J>) -> Self {
        Self { ledger }
    }

    /// Record a transfer request in Pending. No quantity moves yet.
    pub fn create(
        &self,
        id: TransferId,
        product_id: ProductId,
        quantity: i64,
        from_warehouse_id: WarehouseId,
        to_warehouse_id: WarehouseId,
    ) -> LedgerResult<TransferRequest> {
        if quantity <= 0 {
            return Err(LedgerError::validation("transfer quantity must be positive"));
        }
        if from_warehouse_id == to_warehouse_id {
            return Err(LedgerError::validation(
                "transfer source and destination must differ",
            ));
        }
        Ok(TransferRequest::pending(
            id,
            product_id,
            quantity,
            from_warehouse_id,
            to_warehouse_id,
        ))
    }

    /// Pending → InTransit: deduct at the source. On a shortage the transfer
    /// stays Pending and nothing moved.
    pub fn dispatch(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if transfer.status() != TransferStatus::Pending {
            return Err(LedgerError::transition(format!(
                "cannot dispatch transfer in {:?} state",
                transfer.status()
            )));
        }

        self.ledger.post(vec![Posting::transfer_out(
            transfer.product_id(),
            transfer.from_warehouse_id(),
            transfer.to_warehouse_id(),
            transfer.quantity(),
            transfer.id(),
            occurred_at,
        )])?;
        transfer.set_status(TransferStatus::InTransit);
        tracing::info!(transfer_id = %transfer.id(), "transfer dispatched");
        Ok(())
    }

    /// InTransit → Received: credit the destination.
    pub fn complete(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if transfer.status() != TransferStatus::InTransit {
            return Err(LedgerError::transition(format!(
                "cannot complete transfer in {:?} state",
                transfer.status()
            )));
        }

        self.ledger.post(vec![Posting::transfer_in(
            transfer.product_id(),
            transfer.from_warehouse_id(),
            transfer.to_warehouse_id(),
            transfer.quantity(),
            transfer.id(),
            occurred_at,
        )])?;
        transfer.set_status(TransferStatus::Received);
        tracing::info!(transfer_id = %transfer.id(), "transfer completed");
        Ok(())
    }

    /// Cancel a transfer. From Pending nothing moved; from InTransit the
    /// dispatched quantity returns to the source first.
    pub fn cancel(
        &self,
        transfer: &mut TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        match transfer.status() {
            TransferStatus::Pending => {}
            TransferStatus::InTransit => {
                self.ledger.post(vec![Posting::transfer_return(
                    transfer.product_id(),
                    transfer.from_warehouse_id(),
                    transfer.quantity(),
                    transfer.id(),
                    occurred_at,
                )])?;
            }
            TransferStatus::Received | TransferStatus::Cancelled => {
                return Err(LedgerError::transition(format!(
                    "cannot cancel transfer in {:?} state",
                    transfer.status()
                )));
            }
        }
        transfer.set_status(TransferStatus::Cancelled);
        tracing::info!(transfer_id = %transfer.id(), "transfer cancelled");
        Ok(())
    }
}
