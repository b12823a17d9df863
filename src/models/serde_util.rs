//! Custom serde helpers for subgraph wire formats.

/// Deserializes a number that may arrive either as a JSON number or as a
/// numeric string.
///
/// Subgraphs encode `BigInt` and `BigDecimal` scalars as strings while
/// plain `Int` fields stay numeric, so the same field can take either shape
/// depending on the deployed schema.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}"))),
        }
    }
}
