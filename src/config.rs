//! Application configuration loaded from environment variables.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Odds API ===
    /// API key for the odds provider.
    #[serde(default)]
    pub odds_api_key: Option<String>,

    /// Odds API base URL.
    #[serde(default = "default_api_url")]
    pub odds_api_url: String,

    /// Sport key used to select which events to fetch.
    #[serde(default = "default_sport")]
    pub odds_sport: String,

    /// Bookmaker regions requested from the API (e.g. "eu", "uk,eu").
    #[serde(default = "default_regions")]
    pub odds_regions: String,

    // === Scan Parameters ===
    /// Total stake split across outcomes.
    #[serde(default = "default_stake")]
    pub stake: Decimal,

    /// Minimum acceptable profit, in percent.
    #[serde(default = "default_min_profit")]
    pub min_profit_pct: Decimal,

    // === Fallback ===
    /// Fall back to sample events when the fetch fails.
    #[serde(default = "default_true")]
    pub sample_fallback: bool,

    /// Delay before serving sample events after a failed fetch.
    #[serde(default = "default_fallback_delay")]
    pub fallback_delay_ms: u64,

    /// HTTP request timeout.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP server port for the API.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_sport() -> String {
    "soccer_brazil_campeonato".to_string()
}

fn default_regions() -> String {
    "eu".to_string()
}

fn default_stake() -> Decimal {
    Decimal::new(100, 0) // 100 currency units
}

fn default_min_profit() -> Decimal {
    Decimal::new(2, 0) // 2%
}

fn default_true() -> bool {
    true
}

fn default_fallback_delay() -> u64 {
    2000
}

fn default_http_timeout() -> u64 {
    10_000
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_api_key: None,
            odds_api_url: default_api_url(),
            odds_sport: default_sport(),
            odds_regions: default_regions(),
            stake: default_stake(),
            min_profit_pct: default_min_profit(),
            sample_fallback: default_true(),
            fallback_delay_ms: default_fallback_delay(),
            http_timeout_ms: default_http_timeout(),
            port: default_port(),
        }
    }
}

/// Check a stake and profit threshold before scanning.
///
/// Stake must be positive and the threshold within `[0, 100)`.
pub fn check_scan_params(stake: Decimal, min_profit_pct: Decimal) -> Result<(), String> {
    if stake <= Decimal::ZERO {
        return Err("stake must be greater than 0".to_string());
    }

    if min_profit_pct < Decimal::ZERO || min_profit_pct >= Decimal::ONE_HUNDRED {
        return Err("min profit must be in [0, 100)".to_string());
    }

    Ok(())
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        check_scan_params(self.stake, self.min_profit_pct)?;

        if self.odds_sport.trim().is_empty() {
            return Err("ODDS_SPORT must not be empty".to_string());
        }

        if let Err(e) = url::Url::parse(&self.odds_api_url) {
            return Err(format!("ODDS_API_URL is not a valid URL: {}", e));
        }

        Ok(())
    }

    /// API key with surrounding whitespace removed, if non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.odds_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Delay applied before falling back to sample data.
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    /// HTTP request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_stake(), dec!(100));
        assert_eq!(default_min_profit(), dec!(2));
        assert_eq!(default_regions(), "eu");
        assert!(default_true());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_stake() {
        let config = Config {
            stake: dec!(0),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let negative = Config {
            min_profit_pct: dec!(-1),
            ..Config::default()
        };
        let too_high = Config {
            min_profit_pct: dec!(100),
            ..Config::default()
        };

        assert!(negative.validate().is_err());
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_api_url() {
        let config = Config {
            odds_api_url: "not a url".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let config = Config {
            odds_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_key(), None);

        let config = Config {
            odds_api_key: Some(" abc123 ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_key(), Some("abc123"));
    }

    #[test]
    fn scan_params_share_the_threshold_range() {
        assert!(check_scan_params(dec!(50), dec!(0)).is_ok());
        assert!(check_scan_params(dec!(50), dec!(99.99)).is_ok());
        assert!(check_scan_params(dec!(50), dec!(100)).is_err());
        assert!(check_scan_params(dec!(50), dec!(-0.01)).is_err());
        assert!(check_scan_params(dec!(-5), dec!(2)).is_err());
    }
}
