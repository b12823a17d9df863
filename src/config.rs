//! Application configuration loaded from environment variables.
//!
//! Upstream endpoints **must** be provided:
//! - `UDF_PAIR_GRAPH_URL` — GraphQL endpoint of the pair index
//! - `UDF_CANDLE_GRAPH_URL` — GraphQL endpoint of the candle index
//!
//! Optional overrides:
//! - `UDF_REFRESH_INTERVAL_SECS`, `UDF_RETRY_DELAY_SECS`,
//!   `UDF_REQUEST_TIMEOUT_SECS` (all default to 30)
//! - `UDF_EXCHANGE`, `UDF_EXCHANGE_NAME`, `UDF_EXCHANGE_DESC`
//! - `UDF_VOLUME_POLICY` (`period` or `zero`)

use std::time::Duration;

use crate::UdfError;

/// Default catalog refresh period and retry delay.
const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Default per-request upstream timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_EXCHANGE: &str = "MOONBASEALPHA";
const DEFAULT_EXCHANGE_NAME: &str = "Moonbase Alpha";
const DEFAULT_EXCHANGE_DESC: &str = "Moonbase Alpha Exchange";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub catalog: CatalogConfig,
    pub feed: FeedSettings,
}

/// Upstream GraphQL endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub pair_graph_url: String,
    pub candle_graph_url: String,
    pub request_timeout: Duration,
}

/// Symbol catalog timing.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Period of the timer-driven refresh.
    pub refresh_interval: Duration,
    /// Delay before the single retry scheduled after a failed refresh.
    pub retry_delay: Duration,
    /// Upper bound on one pair fetch. A fetch still running after this is
    /// settled as a failed refresh.
    pub fetch_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            retry_delay: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Exchange identity advertised in the feed configuration and stamped on
/// every symbol record.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub exchange: String,
    pub exchange_name: String,
    pub exchange_desc: String,
    pub volume_policy: VolumePolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_string(),
            exchange_name: DEFAULT_EXCHANGE_NAME.to_string(),
            exchange_desc: DEFAULT_EXCHANGE_DESC.to_string(),
            volume_policy: VolumePolicy::default(),
        }
    }
}

/// What fills the `v` array of a bar series.
///
/// The candle index exposes no traded volume, so `Period` reproduces the
/// historical behavior of reporting the bucket length there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VolumePolicy {
    #[default]
    Period,
    Zero,
}

impl std::str::FromStr for VolumePolicy {
    type Err = UdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "period" => Ok(Self::Period),
            "zero" => Ok(Self::Zero),
            other => Err(UdfError::Config(format!(
                "UDF_VOLUME_POLICY must be `period` or `zero`, got `{other}`"
            ))),
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`UdfError::Config`] if an endpoint URL is missing, a duration
/// is not a positive integer, or the volume policy is unknown.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let pair_graph_url = required_var("UDF_PAIR_GRAPH_URL")?;
    let candle_graph_url = required_var("UDF_CANDLE_GRAPH_URL")?;

    let volume_policy = match non_empty_var("UDF_VOLUME_POLICY") {
        Some(value) => value.parse()?,
        None => VolumePolicy::default(),
    };

    let request_timeout = seconds_var("UDF_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

    Ok(AppConfig {
        upstream: UpstreamConfig {
            pair_graph_url,
            candle_graph_url,
            request_timeout,
        },
        catalog: CatalogConfig {
            refresh_interval: seconds_var("UDF_REFRESH_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?,
            retry_delay: seconds_var("UDF_RETRY_DELAY_SECS", DEFAULT_INTERVAL_SECS)?,
            fetch_timeout: request_timeout,
        },
        feed: FeedSettings {
            exchange: non_empty_var("UDF_EXCHANGE").unwrap_or_else(|| DEFAULT_EXCHANGE.into()),
            exchange_name: non_empty_var("UDF_EXCHANGE_NAME")
                .unwrap_or_else(|| DEFAULT_EXCHANGE_NAME.into()),
            exchange_desc: non_empty_var("UDF_EXCHANGE_DESC")
                .unwrap_or_else(|| DEFAULT_EXCHANGE_DESC.into()),
            volume_policy,
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn required_var(name: &str) -> crate::Result<String> {
    non_empty_var(name).ok_or_else(|| UdfError::Config(format!("{name} is not set")))
}

/// Parses a positive whole number of seconds, falling back to `default`.
fn seconds_var(name: &str, default: u64) -> crate::Result<Duration> {
    let secs = match non_empty_var(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| UdfError::Config(format!("{name} must be a number of seconds: {e}")))?,
        None => default,
    };
    if secs == 0 {
        return Err(UdfError::Config(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}
