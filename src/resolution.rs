//! Chart resolution codes and the aggregation periods they map to.
//!
//! The charting library sends minute counts (`"60"`) for intraday bars and
//! `D`/`W` suffixed codes for daily and weekly bars, sometimes with and
//! sometimes without a leading `1`. Only [`Resolution::ADVERTISED`] is
//! offered to clients; the remaining codes are still accepted on incoming
//! history requests.

use std::fmt;
use std::str::FromStr;

use crate::UdfError;

/// A bar granularity supported by the candle index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Minute5,
    Minute15,
    Hour1,
    Hour4,
    Day1,
    Week1,
}

impl Resolution {
    /// Resolutions listed in `supported_resolutions`.
    pub const ADVERTISED: [Resolution; 4] = [Self::Hour1, Self::Hour4, Self::Day1, Self::Week1];

    /// Canonical chart-library code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute5 => "5",
            Self::Minute15 => "15",
            Self::Hour1 => "60",
            Self::Hour4 => "240",
            Self::Day1 => "1D",
            Self::Week1 => "1W",
        }
    }

    /// Duration of one candle in seconds.
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Minute5 => 5 * 60,
            Self::Minute15 => 15 * 60,
            Self::Hour1 => 60 * 60,
            Self::Hour4 => 4 * 60 * 60,
            Self::Day1 => 24 * 60 * 60,
            Self::Week1 => 7 * 24 * 60 * 60,
        }
    }

    /// Codes advertised to clients, in ascending granularity.
    pub fn supported_codes() -> Vec<String> {
        Self::ADVERTISED
            .iter()
            .map(|r| r.as_str().to_string())
            .collect()
    }
}

impl FromStr for Resolution {
    type Err = UdfError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "5" => Ok(Self::Minute5),
            "15" => Ok(Self::Minute15),
            "60" => Ok(Self::Hour1),
            "240" => Ok(Self::Hour4),
            "D" | "1D" => Ok(Self::Day1),
            "W" | "1W" => Ok(Self::Week1),
            other => Err(UdfError::InvalidResolution(other.to_string())),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Looks up the aggregation period for a resolution code.
///
/// # Errors
///
/// Returns [`UdfError::InvalidResolution`] for codes outside the table.
pub fn period_seconds(code: &str) -> crate::Result<u64> {
    code.parse::<Resolution>().map(|r| r.seconds())
}
