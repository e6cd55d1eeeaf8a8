//! Layered lookup of provider credentials and the active provider id.
//!
//! Sources are tried in order and the first one that yields a value wins.
//! A per-call explicit value always goes in front of the configured layers.

use std::sync::Arc;

use {
    async_trait::async_trait,
    darkroom_store::SettingsStore,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
};

/// Setting/env key naming the active provider.
pub const PROVIDER_KEY: &str = "vision_provider";

/// Separator used to join multi-part credentials (`endpoint|key`).
pub const CREDENTIAL_JOIN: &str = "|";

/// Setting keys holding each provider's credential parts, in join order.
///
/// Environment variables use the upper-cased key.
pub fn credential_keys(provider_id: &str) -> Option<&'static [&'static str]> {
    match provider_id {
        "google" => Some(&["google_vision_api_key"]),
        "clarifai" => Some(&["clarifai_api_key"]),
        "azure" => Some(&["azure_vision_endpoint", "azure_vision_key"]),
        _ => None,
    }
}

/// A layer that can answer `get(key)`.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Look up `key`, `None` when absent or unreadable.
    async fn get(&self, key: &str) -> Option<String>;
}

/// Persisted settings table.
///
/// Read errors are logged and treated as "not found".
pub struct SettingsSource {
    store: Arc<dyn SettingsStore>,
}

impl SettingsSource {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialSource for SettingsSource {
    fn name(&self) -> &'static str {
        "settings"
    }

    async fn get(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "settings lookup failed, treating as not found");
                None
            },
        }
    }
}

type EnvLookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Process environment, keyed by the upper-cased setting key.
pub struct EnvSource {
    lookup: Box<EnvLookup>,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSource {
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve variables through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

#[async_trait]
impl CredentialSource for EnvSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(&key.to_uppercase())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ordered credential layers.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    sources: Vec<Arc<dyn CredentialSource>>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("CredentialResolver")
            .field("sources", &names)
            .finish()
    }
}

impl CredentialResolver {
    pub fn new(sources: Vec<Arc<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Settings table first, then the process environment.
    pub fn standard(settings: Arc<dyn SettingsStore>) -> Self {
        Self::new(vec![
            Arc::new(SettingsSource::new(settings)),
            Arc::new(EnvSource::new()),
        ])
    }

    /// First non-blank value for `key`, preferring `explicit`.
    pub async fn resolve_value(&self, explicit: Option<&str>, key: &str) -> Option<String> {
        if let Some(value) = non_blank(explicit.map(String::from)) {
            return Some(value);
        }
        for source in &self.sources {
            if let Some(value) = non_blank(source.get(key).await) {
                debug!(key, source = source.name(), "resolved setting");
                return Some(value);
            }
        }
        None
    }

    /// Credential for `provider_id`, preferring `explicit`.
    ///
    /// A layer only counts when it has every part; parts are joined with
    /// `|`. Providers without known keys can only use an explicit credential.
    pub async fn resolve_credential(
        &self,
        explicit: Option<Secret<String>>,
        provider_id: &str,
    ) -> Option<Secret<String>> {
        if let Some(secret) = explicit
            && !secret.expose_secret().trim().is_empty()
        {
            return Some(secret);
        }

        let keys = credential_keys(provider_id)?;
        for source in &self.sources {
            let mut parts = Vec::with_capacity(keys.len());
            for key in keys {
                match non_blank(source.get(key).await) {
                    Some(part) => parts.push(part),
                    None => break,
                }
            }
            if parts.len() == keys.len() {
                debug!(
                    provider = provider_id,
                    source = source.name(),
                    "resolved credential"
                );
                return Some(Secret::new(parts.join(CREDENTIAL_JOIN)));
            }
        }
        None
    }
}
