//! Pair index wire models.

use serde::Deserialize;

/// Body of the `pairs` query.
#[derive(Debug, Clone, Deserialize)]
pub struct PairsData {
    #[serde(default)]
    pub pairs: Vec<PairRecord>,
}

/// One pair from the pair index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairRecord {
    pub token0: TokenRef,
    pub token1: TokenRef,
}

/// A token as exposed by the pair index.
///
/// `id` is the stable identity used to key candle lookups; `symbol` is a
/// display string and may collide across tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRef {
    pub id: String,
    pub symbol: String,
}

impl PairRecord {
    pub fn new(token0: TokenRef, token1: TokenRef) -> Self {
        Self { token0, token1 }
    }

    /// Pair symbol: the two token symbols concatenated, base first.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.token0.symbol, self.token1.symbol)
    }
}

impl TokenRef {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
        }
    }
}
