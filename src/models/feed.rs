//! Feed capability description returned by the `config` endpoint.

use serde::Serialize;

use crate::config::FeedSettings;
use crate::resolution::Resolution;

/// Static description of what this feed supports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedConfig {
    pub exchanges: Vec<ExchangeDescriptor>,
    pub symbols_types: Vec<SymbolType>,
    pub supported_resolutions: Vec<String>,
    pub supports_search: bool,
    pub supports_group_request: bool,
    pub supports_marks: bool,
    pub supports_timescale_marks: bool,
    pub supports_time: bool,
}

/// An exchange entry in the exchange filter of the symbol search dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeDescriptor {
    pub value: String,
    pub name: String,
    pub desc: String,
}

/// A symbol type entry in the type filter of the symbol search dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolType {
    pub value: String,
    pub name: String,
}

impl FeedConfig {
    pub fn new(settings: &FeedSettings) -> Self {
        Self {
            exchanges: vec![ExchangeDescriptor {
                value: settings.exchange.clone(),
                name: settings.exchange_name.clone(),
                desc: settings.exchange_desc.clone(),
            }],
            symbols_types: vec![SymbolType {
                value: "crypto".to_string(),
                name: "Cryptocurrency".to_string(),
            }],
            supported_resolutions: Resolution::supported_codes(),
            supports_search: true,
            supports_group_request: false,
            supports_marks: false,
            supports_timescale_marks: false,
            supports_time: true,
        }
    }
}
