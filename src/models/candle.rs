//! Candle index wire models and the bar series returned by `history`.

use serde::{Deserialize, Serialize};

use super::serde_util::lenient_f64;
use crate::config::VolumePolicy;

/// Body of the `candles` query.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlesData {
    #[serde(default)]
    pub candles: Vec<CandleRecord>,
}

/// One aggregation bucket for a token pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandleRecord {
    #[serde(default)]
    pub id: String,
    /// Bucket start in unix seconds.
    #[serde(with = "lenient_f64")]
    pub time: f64,
    /// Bucket length in seconds.
    #[serde(with = "lenient_f64")]
    pub period: f64,
    pub token0: String,
    pub token1: String,
    #[serde(with = "lenient_f64")]
    pub low: f64,
    #[serde(with = "lenient_f64")]
    pub open: f64,
    #[serde(with = "lenient_f64")]
    pub high: f64,
    #[serde(with = "lenient_f64")]
    pub close: f64,
}

impl CandleRecord {
    /// Converts the candle into a chart bar.
    ///
    /// The timestamp is floored and made non-negative. The candle index has
    /// no traded volume, so `volume` follows `policy`.
    pub fn to_bar(&self, policy: VolumePolicy) -> Bar {
        let volume = match policy {
            VolumePolicy::Period => self.period,
            VolumePolicy::Zero => 0.0,
        };
        Bar {
            time: self.time.floor().abs() as i64,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume,
        }
    }
}

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Parallel-array encoding of a bar series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarSeries {
    pub t: Vec<i64>,
    pub o: Vec<f64>,
    pub h: Vec<f64>,
    pub l: Vec<f64>,
    pub c: Vec<f64>,
    pub v: Vec<f64>,
}

impl BarSeries {
    pub fn push(&mut self, bar: Bar) {
        self.t.push(bar.time);
        self.o.push(bar.open);
        self.h.push(bar.high);
        self.l.push(bar.low);
        self.c.push(bar.close);
        self.v.push(bar.volume);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

impl FromIterator<Bar> for BarSeries {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        let mut series = Self::default();
        for bar in iter {
            series.push(bar);
        }
        series
    }
}

/// Response of a `history` request.
///
/// Serializes as `{"s":"ok","t":[..],..}` or `{"s":"no_data"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "s", rename_all = "snake_case")]
pub enum HistoryResponse {
    Ok(BarSeries),
    NoData,
}

impl HistoryResponse {
    /// Wraps a series, mapping an empty one to [`HistoryResponse::NoData`].
    pub fn from_series(series: BarSeries) -> Self {
        if series.is_empty() {
            Self::NoData
        } else {
            Self::Ok(series)
        }
    }
}
