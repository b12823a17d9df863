//! One immutable view of the symbol catalog.

use std::collections::HashMap;

use crate::models::{PairRecord, SymbolRecord, SymbolSummary};

/// Symbol records in upstream order plus an index keyed by the upper-cased
/// symbol string. Both halves are built from the same fetch and never
/// mutated afterwards.
///
/// Duplicate symbol strings are all kept in [`Snapshot::symbols`]; the
/// index resolves to the last one listed.
#[derive(Debug, Default)]
pub struct Snapshot {
    symbols: Vec<SymbolRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Builds a snapshot from a pair listing.
    pub fn from_pairs(pairs: &[PairRecord], exchange: &str) -> Self {
        Self::from_records(
            pairs
                .iter()
                .map(|pair| SymbolRecord::from_pair(pair, exchange))
                .collect(),
        )
    }

    /// Builds a snapshot from records already in catalog order.
    pub fn from_records(symbols: Vec<SymbolRecord>) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, record)| (record.symbol.to_uppercase(), i))
            .collect();
        Self { symbols, index }
    }

    /// Number of records, duplicates included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when no symbol is listed.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All records in upstream order.
    pub fn symbols(&self) -> &[SymbolRecord] {
        &self.symbols
    }

    /// Membership check on an already normalized symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Exact lookup on an already normalized symbol.
    pub fn get(&self, symbol: &str) -> Option<&SymbolRecord> {
        self.index.get(symbol).map(|&i| &self.symbols[i])
    }

    /// Filters by exact type and exchange (empty filters match everything),
    /// then by case-insensitive containment of `query`, in catalog order.
    ///
    /// A `limit` of zero means no limit.
    pub fn search(
        &self,
        query: &str,
        tpe: Option<&str>,
        exchange: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<SymbolSummary> {
        let needle = query.to_uppercase();
        let tpe = tpe.filter(|t| !t.is_empty());
        let exchange = exchange.filter(|e| !e.is_empty());
        let limit = limit.filter(|&n| n > 0).unwrap_or(usize::MAX);

        self.symbols
            .iter()
            .filter(|s| tpe.is_none_or(|t| s.tpe == t))
            .filter(|s| exchange.is_none_or(|e| s.exchange == e))
            .filter(|s| s.symbol.to_uppercase().contains(&needle))
            .take(limit)
            .map(SymbolRecord::summary)
            .collect()
    }
}
