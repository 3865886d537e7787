//! Purchase order state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, PurchaseOrderId};

/// Purchase order status lifecycle: Ordered → Received; Ordered → Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Ordered,
    Received,
    Cancelled,
}

/// Requested line content before line numbers are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit cost in smallest currency unit (e.g., cents).
    pub unit_cost: u64,
}

/// One ordered line. `received` tracks per-line receipt so a retry after a
/// partial receipt never credits the same line twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub line_no: u32,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit cost in smallest currency unit (e.g., cents).
    pub unit_cost: u64,
    received: bool,
}

impl PurchaseLine {
    pub fn is_received(&self) -> bool {
        self.received
    }
}

/// A purchase order. Lines are fixed at submission; only the workflow moves
/// the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    /// Opaque supplier reference supplied by the excluded catalog layer.
    supplier_ref: String,
    lines: Vec<PurchaseLine>,
    status: PurchaseOrderStatus,
    received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub(crate) fn ordered(
        id: PurchaseOrderId,
        supplier_ref: impl Into<String>,
        items: Vec<PurchaseItem>,
    ) -> Self {
        let lines = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| PurchaseLine {
                line_no: idx as u32 + 1,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_cost: item.unit_cost,
                received: false,
            })
            .collect();
        Self {
            id,
            supplier_ref: supplier_ref.into(),
            lines,
            status: PurchaseOrderStatus::Ordered,
            received_at: None,
        }
    }

    pub fn id(&self) -> PurchaseOrderId {
        self.id
    }

    pub fn supplier_ref(&self) -> &str {
        &self.supplier_ref
    }

    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    /// Set once, when the last line commits.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    pub fn has_received_lines(&self) -> bool {
        self.lines.iter().any(|line| line.received)
    }

    pub(crate) fn set_status(&mut self, status: PurchaseOrderStatus) {
        self.status = status;
    }

    pub(crate) fn stamp_received_at(&mut self, at: DateTime<Utc>) {
        if self.received_at.is_none() {
            self.received_at = Some(at);
        }
    }

    pub(crate) fn mark_line_received(&mut self, line_no: u32) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.line_no == line_no) {
            line.received = true;
        }
    }
}
