//! Inventory ledger: quantity store, movement journal, posting facade.
//!
//! The quantity store is the single source of truth for "how much is here
//! now"; the journal is the append-only explanation of how it got there. The
//! [`StockLedger`] facade is the only write path: every successful quantity
//! adjustment is paired with exactly one journal append.

pub mod journal;
pub mod post;
pub mod store;

pub use journal::{
    InMemoryMovementJournal, MovementJournal, MovementKind, MovementRecord, MovementRef,
    MovementStatus, NewMovement,
};
pub use post::{Posting, StockLedger};
pub use store::{InMemoryQuantityStore, QuantityStore, StockKey};
