//! Item keys, basket keys and the basket × item incidence table.
//!
//! A basket is everything one customer bought in one calendar month. The
//! same service id means different things under different categories, so
//! items are keyed by `ServiceId_CategoryId`.
//!
//! # Example
//!
//! ```
//! use basket_arl::basket::{BasketKey, IncidenceTable, ItemKey};
//! use basket_arl::data::Transaction;
//!
//! let rows = vec![
//!     Transaction::parse(25446, 4, 5, "2017-08-02").unwrap(),
//!     Transaction::parse(25446, 48, 5, "2017-08-15").unwrap(),
//! ];
//! let table = IncidenceTable::from_transactions(&rows);
//!
//! let basket = BasketKey::from("25446_2017-08");
//! assert_eq!(table.n_baskets(), 1);
//! assert!(table.contains(&basket, &ItemKey::new(4, 5)));
//! assert!(table.contains(&basket, &ItemKey::new(48, 5)));
//! ```

use crate::data::Transaction;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Composite item identifier `ServiceId_CategoryId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Builds the key for a (service, category) pair.
    #[must_use]
    pub fn new(service_id: i64, category_id: i64) -> Self {
        Self(format!("{service_id}_{category_id}"))
    }

    /// Builds the key for a transaction row.
    #[must_use]
    pub fn for_transaction(tx: &Transaction) -> Self {
        Self::new(tx.service_id, tx.category_id)
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Composite basket identifier `UserId_YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketKey(String);

impl BasketKey {
    /// Builds the basket key for a transaction row.
    ///
    /// Day and time of day are discarded.
    #[must_use]
    pub fn for_transaction(tx: &Transaction) -> Self {
        Self(format!("{}_{}", tx.user_id, tx.created_at.format("%Y-%m")))
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BasketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BasketKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for BasketKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Occurrence counts per (basket, item) pair.
pub type BasketItemCounts = BTreeMap<(BasketKey, ItemKey), usize>;

/// Counts how often each item occurs in each basket.
#[must_use]
pub fn basket_item_counts<'a, I>(transactions: I) -> BasketItemCounts
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut counts = BasketItemCounts::new();
    for tx in transactions {
        let key = (BasketKey::for_transaction(tx), ItemKey::for_transaction(tx));
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Dense 0/1 rendering of an [`IncidenceTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseIncidence {
    /// Row labels, sorted
    pub baskets: Vec<BasketKey>,
    /// Column labels, sorted
    pub items: Vec<ItemKey>,
    /// Row-major cells, `baskets.len() * items.len()` long
    pub cells: Vec<u8>,
}

impl DenseIncidence {
    /// Cell value at (row, column).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.baskets.len() || col >= self.items.len() {
            return None;
        }
        self.cells.get(row * self.items.len() + col).copied()
    }
}

/// Sparse basket × item presence matrix.
///
/// Rows are basket keys, columns are every item key observed in the data,
/// and a cell is set iff the item was bought at least once in that basket.
/// Built once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidenceTable {
    rows: BTreeMap<BasketKey, BTreeSet<ItemKey>>,
    items: BTreeSet<ItemKey>,
}

impl IncidenceTable {
    /// Builds the table from raw transaction rows.
    #[must_use]
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_counts(&basket_item_counts(transactions))
    }

    /// Collapses occurrence counts to presence.
    #[must_use]
    pub fn from_counts(counts: &BasketItemCounts) -> Self {
        let mut rows: BTreeMap<BasketKey, BTreeSet<ItemKey>> = BTreeMap::new();
        let mut items = BTreeSet::new();

        for ((basket, item), &count) in counts {
            if count == 0 {
                continue;
            }
            rows.entry(basket.clone()).or_default().insert(item.clone());
            items.insert(item.clone());
        }

        debug!(baskets = rows.len(), items = items.len(), "incidence table built");
        Self { rows, items }
    }

    /// Builds a table directly from basket → items pairs.
    ///
    /// Baskets listed with no items are kept as empty rows.
    #[must_use]
    pub fn from_baskets<I, B, It>(baskets: I) -> Self
    where
        I: IntoIterator<Item = (B, It)>,
        B: Into<BasketKey>,
        It: IntoIterator,
        It::Item: Into<ItemKey>,
    {
        let mut rows: BTreeMap<BasketKey, BTreeSet<ItemKey>> = BTreeMap::new();
        let mut items = BTreeSet::new();
        for (basket, basket_items) in baskets {
            let row = rows.entry(basket.into()).or_default();
            for item in basket_items {
                let item = item.into();
                items.insert(item.clone());
                row.insert(item);
            }
        }
        Self { rows, items }
    }

    /// Whether `item` was bought in `basket`.
    #[must_use]
    pub fn contains(&self, basket: &BasketKey, item: &ItemKey) -> bool {
        self.rows.get(basket).is_some_and(|row| row.contains(item))
    }

    /// Items of one basket.
    #[must_use]
    pub fn basket(&self, basket: &BasketKey) -> Option<&BTreeSet<ItemKey>> {
        self.rows.get(basket)
    }

    /// Iterates over (basket, items) rows in key order.
    pub fn baskets(&self) -> impl Iterator<Item = (&BasketKey, &BTreeSet<ItemKey>)> {
        self.rows.iter()
    }

    /// Every distinct item (column), sorted.
    #[must_use]
    pub fn items(&self) -> &BTreeSet<ItemKey> {
        &self.items
    }

    /// Number of baskets (rows).
    #[must_use]
    pub fn n_baskets(&self) -> usize {
        self.rows.len()
    }

    /// Number of distinct items (columns).
    #[must_use]
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Whether the table has no baskets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Expands the table into a dense 0/1 matrix.
    #[must_use]
    pub fn to_dense(&self) -> DenseIncidence {
        let baskets: Vec<BasketKey> = self.rows.keys().cloned().collect();
        let items: Vec<ItemKey> = self.items.iter().cloned().collect();
        let mut cells = Vec::with_capacity(baskets.len() * items.len());

        for row in self.rows.values() {
            for item in &items {
                cells.push(u8::from(row.contains(item)));
            }
        }

        DenseIncidence {
            baskets,
            items,
            cells,
        }
    }
}
