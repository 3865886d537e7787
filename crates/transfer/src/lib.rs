//! Warehouse-to-warehouse transfers with an explicit in-transit state.
//!
//! Quantity leaves the source at dispatch and lands at the destination only
//! on completion; in between it is held by the transfer itself.

pub mod request;
pub mod workflow;

pub use request::{TransferRequest, TransferStatus};
pub use workflow::Transfers;
