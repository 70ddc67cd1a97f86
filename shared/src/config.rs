use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8081/api";
const DEFAULT_CURRENCY: &str = "USD";

/// Client-side settings shared by the API client and the form controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing slash
    pub api_base_url: String,
    /// Currency code attached to new expenses and payments
    pub default_currency: String,
    pub max_description_length: usize,
    /// Absolute tolerance used when comparing sums of money or percentages
    pub money_tolerance: Decimal,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            max_description_length: 256,
            money_tolerance: Decimal::new(5, 3),
        }
    }
}

impl ClientConfig {
    /// Build the config from variables baked in at compile time.
    ///
    /// A wasm bundle has no process environment, so `SPLITLEDGER_API_BASE_URL`
    /// and `SPLITLEDGER_CURRENCY` are read with `option_env!` when the
    /// frontend is built. Unset variables fall back to the defaults.
    pub fn from_build_env() -> Self {
        Self::from_overrides(
            option_env!("SPLITLEDGER_API_BASE_URL"),
            option_env!("SPLITLEDGER_CURRENCY"),
        )
    }

    pub fn from_overrides(api_base_url: Option<&str>, currency: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = api_base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(code) = currency.map(str::trim).filter(|c| !c.is_empty()) {
            config.default_currency = code.to_uppercase();
        }
        config
    }

    /// Join a path such as `/expenses` onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
