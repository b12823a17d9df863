//! Response-as-a-table encoding used by the `symbol_info` endpoint.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Column name to either an array of per-row values or, when every row
/// holds the same value, that single value.
pub type SymbolTable = Map<String, Value>;

/// Pivots a list of records into a record of columns.
///
/// Columns whose values are all equal collapse to a scalar, which keeps
/// catalogs where most fields are constant compact on the wire.
///
/// # Errors
///
/// Fails if an item does not serialize to a JSON object.
pub fn to_table<T: Serialize>(items: &[T]) -> serde_json::Result<SymbolTable> {
    let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();

    for item in items {
        let Value::Object(row) = serde_json::to_value(item)? else {
            return Err(serde::ser::Error::custom(
                "table rows must serialize to JSON objects",
            ));
        };
        for (key, value) in row {
            columns.entry(key).or_default().push(value);
        }
    }

    Ok(columns
        .into_iter()
        .map(|(key, mut values)| {
            let constant = values
                .first()
                .is_some_and(|first| values.iter().all(|v| v == first));
            let column = if constant {
                values.swap_remove(0)
            } else {
                Value::Array(values)
            };
            (key, column)
        })
        .collect())
}
