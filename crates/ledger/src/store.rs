//! Quantity store: durable mapping of (product, warehouse) to on-hand stock.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, LedgerResult, ProductId, WarehouseId};

/// Key of one stock level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
}

impl StockKey {
    pub fn new(product_id: ProductId, warehouse_id: WarehouseId) -> Self {
        Self {
            product_id,
            warehouse_id,
        }
    }
}

/// Arbiter of stock quantities.
///
/// All mutation goes through [`QuantityStore::adjust_all`], which serializes
/// concurrent adjustments to the same keys. Callers that need
/// read-then-decide-then-write atomicity must rely on the built-in
/// non-negativity check rather than a separate read + write pair.
pub trait QuantityStore: Send + Sync {
    /// All-or-nothing adjustment across one or more keys.
    ///
    /// Duplicate keys in `deltas` are coalesced before checking. If any
    /// resulting quantity would be negative, fails with
    /// [`LedgerError::InsufficientStock`] and **no** quantity changes. On
    /// success returns the new quantity per unique key, in first-seen order.
    fn adjust_all(&self, deltas: &[(StockKey, i64)]) -> LedgerResult<Vec<(StockKey, i64)>>;

    /// Point-in-time snapshot read. Absent rows read as quantity 0.
    fn read(&self, key: StockKey) -> LedgerResult<i64>;

    /// Warehouses currently holding positive stock for a product, in
    /// deterministic (UUID byte) order.
    fn warehouses_holding(&self, product_id: ProductId) -> LedgerResult<Vec<WarehouseId>>;

    /// Snapshot of all positive stock levels, in deterministic order.
    fn snapshot(&self) -> LedgerResult<Vec<(StockKey, i64)>>;

    /// Atomically check-and-adjust a single stock level. Returns the new
    /// quantity.
    fn adjust(&self, key: StockKey, delta: i64) -> LedgerResult<i64> {
        let results = self.adjust_all(&[(key, delta)])?;
        Ok(results.into_iter().next().map(|(_, q)| q).unwrap_or(0))
    }
}

/// In-memory quantity store.
///
/// Adjustments serialize on a single write lock; a row at quantity 0 is
/// removed, so absent and zero are the same observable state. Intended for
/// tests/dev and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryQuantityStore {
    levels: RwLock<HashMap<StockKey, i64>>,
}

impl InMemoryQuantityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuantityStore for InMemoryQuantityStore {
    fn adjust_all(&self, deltas: &[(StockKey, i64)]) -> LedgerResult<Vec<(StockKey, i64)>> {
        if deltas.is_empty() {
            return Ok(vec![]);
        }

        // Coalesce duplicate keys so an order listing the same (product,
        // warehouse) twice is checked against the combined delta.
        let mut order: Vec<StockKey> = Vec::new();
        let mut net: HashMap<StockKey, i64> = HashMap::new();
        for (key, delta) in deltas {
            let entry = net.entry(*key).or_insert_with(|| {
                order.push(*key);
                0
            });
            *entry = entry
                .checked_add(*delta)
                .ok_or_else(|| LedgerError::validation("quantity delta overflow"))?;
        }

        let mut levels = self
            .levels
            .write()
            .map_err(|_| LedgerError::storage("quantity store lock poisoned"))?;

        // Check every key before touching any.
        let mut resulting = Vec::with_capacity(order.len());
        for key in &order {
            let current = levels.get(key).copied().unwrap_or(0);
            let delta = net[key];
            let new = current
                .checked_add(delta)
                .ok_or_else(|| LedgerError::validation("quantity overflow"))?;
            if new < 0 {
                return Err(LedgerError::insufficient_stock(
                    key.product_id,
                    key.warehouse_id,
                    -delta,
                    current,
                ));
            }
            resulting.push((*key, new));
        }

        for (key, new) in &resulting {
            if *new == 0 {
                levels.remove(key);
            } else {
                levels.insert(*key, *new);
            }
        }

        Ok(resulting)
    }

    fn read(&self, key: StockKey) -> LedgerResult<i64> {
        let levels = self
            .levels
            .read()
            .map_err(|_| LedgerError::storage("quantity store lock poisoned"))?;
        Ok(levels.get(&key).copied().unwrap_or(0))
    }

    fn warehouses_holding(&self, product_id: ProductId) -> LedgerResult<Vec<WarehouseId>> {
        let levels = self
            .levels
            .read()
            .map_err(|_| LedgerError::storage("quantity store lock poisoned"))?;
        let mut warehouses: Vec<WarehouseId> = levels
            .iter()
            .filter(|(key, qty)| key.product_id == product_id && **qty > 0)
            .map(|(key, _)| key.warehouse_id)
            .collect();
        warehouses.sort_by_key(|w| *w.as_uuid().as_bytes());
        Ok(warehouses)
    }

    fn snapshot(&self) -> LedgerResult<Vec<(StockKey, i64)>> {
        let levels = self
            .levels
            .read()
            .map_err(|_| LedgerError::storage("quantity store lock poisoned"))?;
        let mut rows: Vec<(StockKey, i64)> = levels.iter().map(|(k, q)| (*k, *q)).collect();
        rows.sort_by_key(|(k, _)| {
            (
                *k.product_id.as_uuid().as_bytes(),
                *k.warehouse_id.as_uuid().as_bytes(),
            )
        });
        Ok(rows)
    }
}
