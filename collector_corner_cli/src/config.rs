use crate::error::ConfigError;
use crate::fetcher::DEFAULT_FETCH_TIMEOUT;
use crate::generator::{DEFAULT_BASE_URL, DEFAULT_COMPLETION_TIMEOUT, DEFAULT_MODEL};
use crate::render::DEFAULT_SHOP_NAME;
use reqwest::header::HeaderValue;
use std::{ops::RangeInclusive, time::Duration};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Page fetches stay bounded to a few seconds.
pub const FETCH_TIMEOUT_SECS: RangeInclusive<u64> = 5..=10;
pub const COMPLETION_TIMEOUT_SECS: RangeInclusive<u64> = 1..=600;

/// Settings shared by the CLI and the server, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub fetch_timeout: Duration,
    pub completion_timeout: Duration,
    pub shop_name: String,
}

impl Config {
    /// Fails when `OPENAI_API_KEY` is missing, blank or not sendable as a
    /// header, or when a timeout falls outside its allowed range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR)
            .ok_or(ConfigError::Missing(API_KEY_VAR))?
            .trim()
            .to_string();
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ConfigError::InvalidApiKey(API_KEY_VAR))?;

        let seconds = |name: &'static str, default: Duration, range: RangeInclusive<u64>| {
            let secs = match non_blank(name) {
                None => return Ok(default),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber { name, value })?,
            };
            if range.contains(&secs) {
                Ok(Duration::from_secs(secs))
            } else {
                Err(ConfigError::OutOfRange {
                    name,
                    value: secs,
                    min: *range.start(),
                    max: *range.end(),
                })
            }
        };

        Ok(Self {
            api_key,
            model: non_blank("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_blank("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fetch_timeout: seconds("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT, FETCH_TIMEOUT_SECS)?,
            completion_timeout: seconds(
                "COMPLETION_TIMEOUT_SECS",
                DEFAULT_COMPLETION_TIMEOUT,
                COMPLETION_TIMEOUT_SECS,
            )?,
            shop_name: non_blank("SHOP_NAME").unwrap_or_else(|| DEFAULT_SHOP_NAME.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_fails_fast() {
        assert_eq!(
            Config::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(API_KEY_VAR))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[(API_KEY_VAR, "  ")])),
            Err(ConfigError::Missing(API_KEY_VAR))
        );
    }

    #[test]
    fn defaults_fill_everything_else() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "sk-abc")])).unwrap();
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.completion_timeout, Duration::from_secs(60));
        assert_eq!(config.shop_name, "Music Record Shop");
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-abc"),
            ("OPENAI_MODEL", "gpt-4.1"),
            ("FETCH_TIMEOUT_SECS", "5"),
            ("SHOP_NAME", "Spin City"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.shop_name, "Spin City");
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "k"), ("FETCH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: "FETCH_TIMEOUT_SECS",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn fetch_timeout_must_stay_within_bounds() {
        for (raw, expected) in [("5", 5), ("10", 10), (" 7 ", 7)] {
            let config =
                Config::from_lookup(lookup(&[(API_KEY_VAR, "k"), ("FETCH_TIMEOUT_SECS", raw)])).unwrap();
            assert_eq!(config.fetch_timeout, Duration::from_secs(expected));
        }

        for value in [0, 4, 11, 3600] {
            let raw = value.to_string();
            let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "k"), ("FETCH_TIMEOUT_SECS", &raw)]))
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::OutOfRange {
                    name: "FETCH_TIMEOUT_SECS",
                    value,
                    min: 5,
                    max: 10
                }
            );
        }
    }

    #[test]
    fn zero_completion_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "k"), ("COMPLETION_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "COMPLETION_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn api_key_that_cannot_be_a_header_fails_fast() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "sk-abc\ndef")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidApiKey(API_KEY_VAR));
    }
}
