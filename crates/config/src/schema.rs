/// Config schema types (database, analysis defaults, vision providers).
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkroomConfig {
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub providers: ProvidersConfig,
}

/// Content store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://darkroom.db`.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://darkroom.db".into(),
        }
    }
}

/// Defaults for image categorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Provider used when neither the caller, the settings table nor the
    /// environment names one.
    pub provider: String,
    /// Upper bound on `suggestedCategories`.
    pub max_suggestions: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            max_suggestions: 5,
        }
    }
}

impl AnalysisConfig {
    /// `max_suggestions`, never below one so a suggestion always fits.
    pub fn effective_max_suggestions(&self) -> usize {
        self.max_suggestions.max(1)
    }
}

/// Vision provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Provider-specific settings keyed by provider id.
    /// Known keys: "google", "clarifai", "azure"
    #[serde(flatten)]
    pub providers: HashMap<String, ProviderEntry>,
}

/// Configuration for a single vision provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEntry {
    /// Whether this provider is enabled. Defaults to true.
    pub enabled: bool,

    /// Override the API base URL. Ignored by providers whose endpoint is
    /// part of the credential.
    pub base_url: Option<String>,
}

impl Default for ProviderEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

impl ProvidersConfig {
    /// Check if a provider is enabled (defaults to true if not configured).
    pub fn is_enabled(&self, id: &str) -> bool {
        self.providers.get(id).is_none_or(|e| e.enabled)
    }

    /// Get the configured entry for a provider, if any.
    pub fn get(&self, id: &str) -> Option<&ProviderEntry> {
        self.providers.get(id)
    }

    /// Configured base URL override for a provider.
    pub fn base_url(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.base_url.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DarkroomConfig::default();
        assert_eq!(config.analysis.provider, "google");
        assert_eq!(config.analysis.max_suggestions, 5);
        assert!(config.providers.is_enabled("clarifai"));
        assert!(config.providers.base_url("google").is_none());
    }

    #[test]
    fn max_suggestions_never_zero() {
        let analysis = AnalysisConfig {
            max_suggestions: 0,
            ..Default::default()
        };
        assert_eq!(analysis.effective_max_suggestions(), 1);
    }

    #[test]
    fn parses_provider_entries() {
        let raw = r#"
            [analysis]
            provider = "azure"

            [providers.clarifai]
            enabled = false

            [providers.google]
            base_url = "http://localhost:9000"
        "#;
        let config: DarkroomConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.analysis.provider, "azure");
        assert_eq!(config.analysis.max_suggestions, 5);
        assert!(!config.providers.is_enabled("clarifai"));
        assert!(config.providers.is_enabled("google"));
        assert_eq!(
            config.providers.base_url("google"),
            Some("http://localhost:9000")
        );
    }
}
