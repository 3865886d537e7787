//! Sales order state.

use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, SalesOrderId, WarehouseId};

/// Sales order status lifecycle.
///
/// Draft → {Reserved, Backordered} → Shipped; Draft/Reserved/Backordered →
/// Cancelled. Backordered orders may be re-submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrderStatus {
    Draft,
    Reserved,
    Backordered,
    Shipped,
    Cancelled,
}

/// One requested line: product, fulfilling warehouse, quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

/// A sales order. Items are fixed at draft creation; only the workflow moves
/// the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    id: SalesOrderId,
    /// Opaque customer reference supplied by the excluded catalog layer.
    customer_ref: String,
    items: Vec<OrderItem>,
    status: SalesOrderStatus,
}

impl SalesOrder {
    pub fn draft(
        id: SalesOrderId,
        customer_ref: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id,
            customer_ref: customer_ref.into(),
            items,
            status: SalesOrderStatus::Draft,
        }
    }

    pub fn id(&self) -> SalesOrderId {
        self.id
    }

    pub fn customer_ref(&self) -> &str {
        &self.customer_ref
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> SalesOrderStatus {
        self.status
    }

    /// Submission is the retry hook: legal from Draft and from Backordered.
    pub fn is_submittable(&self) -> bool {
        matches!(
            self.status,
            SalesOrderStatus::Draft | SalesOrderStatus::Backordered
        )
    }

    pub(crate) fn set_status(&mut self, status: SalesOrderStatus) {
        self.status = status;
    }
}
