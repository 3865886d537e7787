//! Transfer request state.

use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, TransferId, WarehouseId};

/// Transfer status lifecycle: Pending → InTransit → Received;
/// Pending/InTransit → Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    InTransit,
    Received,
    Cancelled,
}

/// A request to move quantity between two warehouses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    id: TransferId,
    product_id: ProductId,
    quantity: i64,
    from_warehouse_id: WarehouseId,
    to_warehouse_id: WarehouseId,
    status: TransferStatus,
}

impl TransferRequest {
    pub(crate) fn pending(
        id: TransferId,
        product_id: ProductId,
        quantity: i64,
        from_warehouse_id: WarehouseId,
        to_warehouse_id: WarehouseId,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            from_warehouse_id,
            to_warehouse_id,
            status: TransferStatus::Pending,
        }
    }

    pub fn id(&self) -> TransferId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn from_warehouse_id(&self) -> WarehouseId {
        self.from_warehouse_id
    }

    pub fn to_warehouse_id(&self) -> WarehouseId {
        self.to_warehouse_id
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: TransferStatus) {
        self.status = status;
    }
}
