//! Purchase-order replenishment: submission, goods receipt, cancellation.
//!
//! Receipt is per-line atomic: a line that cannot resolve a destination
//! warehouse fails alone, while resolved lines commit — a partial delivery is
//! a legitimate physical event, unlike a partial sales reservation.

pub mod order;
pub mod resolve;
pub mod workflow;

pub use order::{PurchaseItem, PurchaseLine, PurchaseOrder, PurchaseOrderStatus};
pub use resolve::{DestinationResolver, StockedOrDefault};
pub use workflow::{LineFailure, ReceiptOutcome, ReceivedLine, Replenishment};
