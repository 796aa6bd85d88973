//! Environment-based configuration.
//!
//! All settings come from the process environment at startup:
//!
//! - `OPENAI_API_KEY` -- the provider API key. Its absence is NOT validated
//!   here: a missing key surfaces as an authentication failure from the
//!   provider on the first call.
//! - `ENGITUTOR_MODEL` -- completion model (default `gpt-5-mini-2025-08-07`).
//! - `ENGITUTOR_PROVIDER_TIMEOUT_SECS` -- bound on the outbound provider
//!   call (default 60).
//! - `ENGITUTOR_DATA_DIR` -- database location, see
//!   [`crate::sqlite::pool::default_database_url`].

use std::time::Duration;

use secrecy::SecretString;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-5-mini-2025-08-07";

/// Default provider timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration resolved from the environment.
pub struct AppConfig {
    pub api_key: SecretString,
    pub model: String,
    pub provider_timeout: Duration,
    pub database_url: String,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        let api_key = SecretString::from(std::env::var("OPENAI_API_KEY").unwrap_or_default());

        let model =
            std::env::var("ENGITUTOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let provider_timeout = std::env::var("ENGITUTOR_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| {
                tracing::debug!(
                    "ENGITUTOR_PROVIDER_TIMEOUT_SECS not set, using {DEFAULT_TIMEOUT_SECS}s"
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            });

        let database_url = crate::sqlite::pool::default_database_url();

        Self {
            api_key,
            model,
            provider_timeout,
            database_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        // SAFETY: tests in this module touch distinct env vars and restore them.
        unsafe {
            std::env::remove_var("ENGITUTOR_MODEL");
            std::env::remove_var("ENGITUTOR_PROVIDER_TIMEOUT_SECS");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn unparseable_timeout_falls_back_to_default() {
        // SAFETY: single test mutating this var; removed before returning.
        unsafe { std::env::set_var("ENGITUTOR_PROVIDER_TIMEOUT_SECS", "soon") };
        let config = AppConfig::from_env();
        assert_eq!(config.provider_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        unsafe { std::env::remove_var("ENGITUTOR_PROVIDER_TIMEOUT_SECS") };
    }
}
