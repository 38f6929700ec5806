//! Centralized configuration for Marquee.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded endpoints scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::{MarqueeError, Result};

/// Central configuration for all Marquee components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub provider: ProviderConfig,
    pub player: PlayerConfig,
    pub storage: StorageConfig,
}

/// Metadata provider connection settings.
///
/// Controls where catalogue requests go, how they authenticate, and which
/// locale the provider should answer in.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Versioned API root, without trailing slash
    pub base_url: String,
    /// Root for poster and backdrop images
    pub image_base_url: String,
    /// Bearer token sent with every request
    pub api_token: String,
    /// Fixed locale parameter attached to every request
    pub language: String,
    /// Overall request timeout (None = transport default)
    pub request_timeout: Option<Duration>,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_token: String::new(),
            language: "en-US".to_string(),
            request_timeout: None,
            user_agent: "marquee/0.1.0",
        }
    }
}

/// Embeddable player configuration.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Embed root, without trailing slash
    pub base_url: String,
    pub movie_endpoint: &'static str,
    pub series_endpoint: &'static str,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vidsrc.xyz/embed".to_string(),
            movie_endpoint: "/movie",
            series_endpoint: "/tv",
        }
    }
}

/// Local preference storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// File holding persisted preferences
    pub preferences_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            preferences_path: base.join("marquee").join("preferences.json"),
        }
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Provider configuration overrides
        if let Ok(token) = std::env::var("MARQUEE_API_TOKEN") {
            config.provider.api_token = token;
        }

        if let Ok(base_url) = std::env::var("MARQUEE_API_BASE_URL") {
            config.provider.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(image_base_url) = std::env::var("MARQUEE_IMAGE_BASE_URL") {
            config.provider.image_base_url = image_base_url.trim_end_matches('/').to_string();
        }

        if let Ok(language) = std::env::var("MARQUEE_LANGUAGE") {
            config.provider.language = language;
        }

        if let Ok(timeout) = std::env::var("MARQUEE_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.provider.request_timeout = Some(Duration::from_secs(seconds));
            }
        }

        // Player and storage overrides
        if let Ok(player_url) = std::env::var("MARQUEE_PLAYER_BASE_URL") {
            config.player.base_url = player_url.trim_end_matches('/').to_string();
        }

        if let Ok(path) = std::env::var("MARQUEE_PREFERENCES_PATH") {
            config.storage.preferences_path = PathBuf::from(path);
        }

        config
    }

    /// Creates a configuration pointing at a local stub provider.
    pub fn for_testing(base_url: &str) -> Self {
        let mut config = Self::default();
        config.provider.base_url = base_url.trim_end_matches('/').to_string();
        config.provider.api_token = "test-token".to_string();
        config.storage.preferences_path =
            std::env::temp_dir().join("marquee-test-preferences.json");
        config
    }

    /// Checks that endpoints parse and a credential is present.
    ///
    /// # Errors
    ///
    /// - `MarqueeError::Configuration` - If a URL is malformed or the API token is empty
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("provider base URL", &self.provider.base_url),
            ("image base URL", &self.provider.image_base_url),
            ("player base URL", &self.player.base_url),
        ] {
            url::Url::parse(value).map_err(|e| MarqueeError::Configuration {
                reason: format!("invalid {name} '{value}': {e}"),
            })?;
        }

        if self.provider.api_token.trim().is_empty() {
            return Err(MarqueeError::Configuration {
                reason: "MARQUEE_API_TOKEN is not set".to_string(),
            });
        }

        if self.provider.language.trim().is_empty() {
            return Err(MarqueeError::Configuration {
                reason: "language must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MarqueeConfig::default();

        assert_eq!(config.provider.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.provider.language, "en-US");
        assert_eq!(config.provider.request_timeout, None);
        assert_eq!(config.player.base_url, "https://vidsrc.xyz/embed");
        assert_eq!(config.player.movie_endpoint, "/movie");
        assert_eq!(config.player.series_endpoint, "/tv");
        assert!(config.storage.preferences_path.ends_with("marquee/preferences.json"));
    }

    #[test]
    fn test_validate_requires_token() {
        let config = MarqueeConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MarqueeError::Configuration { .. }));

        let testing = MarqueeConfig::for_testing("http://127.0.0.1:9999/3/");
        assert_eq!(testing.provider.base_url, "http://127.0.0.1:9999/3");
        assert!(testing.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = MarqueeConfig::for_testing("http://127.0.0.1:9999");
        config.player.base_url = "not a url".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("player base URL"));
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("MARQUEE_API_TOKEN", "abc123");
            std::env::set_var("MARQUEE_API_BASE_URL", "http://localhost:8080/3/");
            std::env::set_var("MARQUEE_LANGUAGE", "de-DE");
            std::env::set_var("MARQUEE_REQUEST_TIMEOUT", "15");
            std::env::set_var("MARQUEE_PREFERENCES_PATH", "/tmp/marquee-prefs.json");
        }

        let config = MarqueeConfig::from_env();

        assert_eq!(config.provider.api_token, "abc123");
        assert_eq!(config.provider.base_url, "http://localhost:8080/3");
        assert_eq!(config.provider.language, "de-DE");
        assert_eq!(config.provider.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            config.storage.preferences_path,
            PathBuf::from("/tmp/marquee-prefs.json")
        );

        // Cleanup
        unsafe {
            std::env::remove_var("MARQUEE_API_TOKEN");
            std::env::remove_var("MARQUEE_API_BASE_URL");
            std::env::remove_var("MARQUEE_LANGUAGE");
            std::env::remove_var("MARQUEE_REQUEST_TIMEOUT");
            std::env::remove_var("MARQUEE_PREFERENCES_PATH");
        }
    }
}
