//! Sales-order fulfillment: reservation, shipment, cancellation.
//!
//! The reservation policy is all-or-nothing per order: if any single item
//! cannot be satisfied, the whole order is backordered and no quantity is
//! deducted for any item.

pub mod order;
pub mod reservation;
pub mod workflow;

pub use order::{OrderItem, SalesOrder, SalesOrderStatus};
pub use reservation::{ReservationManager, ReservationOutcome, Shortage};
pub use workflow::Fulfillment;
