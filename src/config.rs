//! Environment-driven configuration.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Every variable has a default so the binary runs with no setup.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CLASSIFY_URL: &str = "https://uscensus.prod.3ceonline.com/ui/classify";
const DEFAULT_FIND_URL: &str =
    "https://uscensus.prod.3ceonline.com/ui/tradedata/export/schedule/find";
const DEFAULT_VENDOR_ORIGIN: &str = "https://uscensus.prod.3ceonline.com";
const DEFAULT_PROFILE_ID: &str = "57471f0c4ac2c9b910000000";
const DEFAULT_SESSION_TTL_SECS: i64 = 25 * 60;

/// Problems found while reading the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `SCHEDB_SESSION_TTL_SECS` was not a positive integer.
    #[error("SCHEDB_SESSION_TTL_SECS must be a positive integer, got {0:?}")]
    InvalidSessionTtl(String),
    /// `SCHEDB_STOP_AT_HS6` was neither `Y` nor `N`.
    #[error("SCHEDB_STOP_AT_HS6 must be Y or N, got {0:?}")]
    InvalidStopAtHs6(String),
    /// A URL variable was empty.
    #[error("{0} must not be empty")]
    EmptyUrl(&'static str),
}

/// Bookkeeping fields sent with every classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Vendor profile id.
    #[serde(rename = "profileId")]
    pub profile_id: String,
    /// Vendor username field.
    pub username: String,
    /// Vendor user data field.
    #[serde(rename = "userData")]
    pub user_data: String,
    /// Origin country.
    pub origin: String,
    /// Destination country.
    pub destination: String,
    /// `Y` to stop at six-digit headings.
    #[serde(rename = "stopAtHS6")]
    pub stop_at_hs6: String,
}

impl Default for VendorProfile {
    fn default() -> Self {
        Self {
            profile_id: DEFAULT_PROFILE_ID.into(),
            username: "NOT_SET".into(),
            user_data: "NO_DATA_AVAIL".into(),
            origin: "US".into(),
            destination: "US".into(),
            stop_at_hs6: "N".into(),
        }
    }
}

/// Vendor endpoints and request defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorConfig {
    /// Classification endpoint (POST).
    pub classify_url: String,
    /// Schedule lookup base URL (GET).
    pub find_url: String,
    /// Value of the `Origin` header.
    pub origin_header: String,
    /// Language code.
    pub lang: String,
    /// Profile fields.
    pub profile: VendorProfile,
    /// Lifetime of a captured vendor session cookie, in seconds.
    pub session_ttl_secs: i64,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            classify_url: DEFAULT_CLASSIFY_URL.into(),
            find_url: DEFAULT_FIND_URL.into(),
            origin_header: DEFAULT_VENDOR_ORIGIN.into(),
            lang: "en".into(),
            profile: VendorProfile::default(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Vendor settings.
    pub vendor: VendorConfig,
    /// Webhook receiving leaf selections, if any.
    pub notify_url: Option<String>,
    /// Fallback tracing filter.
    pub log_level: String,
    /// Directory for recorded cassettes, if recording.
    pub record_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vendor: VendorConfig::default(),
            notify_url: None,
            log_level: "warn".into(),
            record_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed values.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = VendorConfig::default();
        let profile_defaults = VendorProfile::default();

        let session_ttl_secs = match env::var("SCHEDB_SESSION_TTL_SECS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidSessionTtl(raw)),
            },
            Err(_) => defaults.session_ttl_secs,
        };

        let stop_at_hs6 = var_or("SCHEDB_STOP_AT_HS6", &profile_defaults.stop_at_hs6);
        let stop_at_hs6 = match stop_at_hs6.trim().to_ascii_uppercase().as_str() {
            "Y" => "Y".to_string(),
            "N" => "N".to_string(),
            _ => return Err(ConfigError::InvalidStopAtHs6(stop_at_hs6)),
        };

        let vendor = VendorConfig {
            classify_url: url_var("SCHEDB_CLASSIFY_URL", &defaults.classify_url)?,
            find_url: url_var("SCHEDB_FIND_URL", &defaults.find_url)?,
            origin_header: url_var("SCHEDB_VENDOR_ORIGIN", &defaults.origin_header)?,
            lang: var_or("SCHEDB_LANG", &defaults.lang),
            profile: VendorProfile {
                profile_id: var_or("SCHEDB_PROFILE_ID", &profile_defaults.profile_id),
                username: var_or("SCHEDB_USERNAME", &profile_defaults.username),
                user_data: var_or("SCHEDB_USER_DATA", &profile_defaults.user_data),
                origin: var_or("SCHEDB_ORIGIN_COUNTRY", &profile_defaults.origin),
                destination: var_or("SCHEDB_DESTINATION_COUNTRY", &profile_defaults.destination),
                stop_at_hs6,
            },
            session_ttl_secs,
        };

        Ok(Self {
            vendor,
            notify_url: env::var("SCHEDB_NOTIFY_URL").ok().filter(|v| !v.trim().is_empty()),
            log_level: var_or("SCHEDB_LOG_LEVEL", "warn"),
            record_dir: env::var("SCHEDB_RECORD").ok().filter(|v| !v.trim().is_empty()),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

fn url_var(key: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyUrl(key)),
        Ok(value) => Ok(value.trim().trim_end_matches('/').to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "SCHEDB_CLASSIFY_URL",
            "SCHEDB_FIND_URL",
            "SCHEDB_VENDOR_ORIGIN",
            "SCHEDB_LANG",
            "SCHEDB_PROFILE_ID",
            "SCHEDB_USERNAME",
            "SCHEDB_USER_DATA",
            "SCHEDB_ORIGIN_COUNTRY",
            "SCHEDB_DESTINATION_COUNTRY",
            "SCHEDB_STOP_AT_HS6",
            "SCHEDB_SESSION_TTL_SECS",
            "SCHEDB_NOTIFY_URL",
            "SCHEDB_LOG_LEVEL",
            "SCHEDB_RECORD",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.vendor, VendorConfig::default());
        assert_eq!(config.log_level, "warn");
        assert!(config.notify_url.is_none());
        assert!(config.record_dir.is_none());
    }

    #[test]
    fn rejects_non_numeric_ttl() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCHEDB_SESSION_TTL_SECS", "soon");
        let err = AppConfig::load().unwrap_err();
        assert_eq!(err, ConfigError::InvalidSessionTtl("soon".into()));
        reset_env();
    }

    #[test]
    fn stop_at_hs6_is_normalized() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCHEDB_STOP_AT_HS6", "y");
        let config = AppConfig::load().unwrap();
        assert_eq!(config.vendor.profile.stop_at_hs6, "Y");

        env::set_var("SCHEDB_STOP_AT_HS6", "maybe");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidStopAtHs6(_))));
        reset_env();
    }

    #[test]
    fn trailing_slash_is_trimmed_from_urls() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCHEDB_FIND_URL", "http://localhost:9000/find/");
        let config = AppConfig::load().unwrap();
        assert_eq!(config.vendor.find_url, "http://localhost:9000/find");
        reset_env();
    }
}
