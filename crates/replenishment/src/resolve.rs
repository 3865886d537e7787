//! Destination resolution: where received goods land.
//!
//! A named, pluggable policy with an explicit failure mode — never a silent
//! arbitrary warehouse choice.

use stockledger_core::{LedgerResult, ProductId, WarehouseId};
use stockledger_ledger::QuantityStore;

/// Chooses the warehouse a received product is credited to. `Ok(None)` means
/// no warehouse could be resolved and the line must fail with
/// `NoDestinationWarehouse`.
pub trait DestinationResolver {
    fn resolve(&self, product_id: ProductId) -> LedgerResult<Option<WarehouseId>>;
}

/// Reference policy: the warehouse already holding stock for the product,
/// else a designated default warehouse, else nothing.
#[derive(Debug)]
pub struct StockedOrDefault<'a, S> {
    store: &'a S,
    default: Option<WarehouseId>,
}

impl<'a, S: QuantityStore> StockedOrDefault<'a, S> {
    pub fn new(store: &'a S, default: Option<WarehouseId>) -> Self {
        Self { store, default }
    }
}

impl<'a, S: QuantityStore> DestinationResolver for StockedOrDefault<'a, S> {
    fn resolve(&self, product_id: ProductId) -> LedgerResult<Option<WarehouseId>> {
        let holding = self.store.warehouses_holding(product_id)?;
        Ok(holding.into_iter().next().or(self.default))
    }
}
