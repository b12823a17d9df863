//! GraphQL documents sent to the pair and candle indexes.

use super::CandleQuery;

/// Lists every pair with the symbol and id of both tokens.
pub const PAIRS_QUERY: &str = r#"
query Pairs {
  pairs {
    token0 {
      symbol
      id
    }
    token1 {
      symbol
      id
    }
  }
}
"#;

/// Renders the candle query for one pair, period and time range.
///
/// Token ids are emitted as quoted string literals so an id containing
/// quotes or backslashes cannot break out of the filter.
pub fn candles_query(query: &CandleQuery) -> String {
    let token0 = serde_json::Value::String(query.token0.clone());
    let token1 = serde_json::Value::String(query.token1.clone());
    format!(
        r#"
{{
  candles(
    first: {first}
    orderBy: time
    orderDirection: asc
    where: {{
      time_gte: {from}
      time_lte: {to}
      period: {period}
      token0: {token0}
      token1: {token1}
    }}
  ) {{
    id
    time
    period
    token0
    token1
    low
    open
    high
    close
  }}
}}
"#,
        first = query.first,
        from = query.from,
        to = query.to,
        period = query.period,
    )
}
