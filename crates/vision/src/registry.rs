use std::sync::Arc;

use crate::types::VisionProvider;

/// Lookup-by-id dispatch table for vision providers.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn VisionProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider, replacing any existing one with the same id.
    pub fn register(&mut self, provider: Arc<dyn VisionProvider>) {
        self.providers.retain(|p| p.id() != provider.id());
        self.providers.push(provider);
    }

    /// Find a provider by id, ignoring case and surrounding whitespace.
    pub fn get(&self, id: &str) -> Option<&dyn VisionProvider> {
        let id = id.trim();
        self.providers
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(id))
            .map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// `(id, name)` pairs in registration order.
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        self.providers.iter().map(|p| (p.id(), p.name())).collect()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::providers::{AzureVision, ClarifaiVision, GoogleVision},
    };

    fn all_providers() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(GoogleVision::new()));
        registry.register(Arc::new(ClarifaiVision::new()));
        registry.register(Arc::new(AzureVision::new()));
        registry
    }

    #[test]
    fn test_registration_order() {
        let registry = all_providers();
        assert_eq!(registry.ids(), vec!["google", "clarifai", "azure"]);
        assert_eq!(registry.list()[2], ("azure", "Azure Computer Vision"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = all_providers();
        assert_eq!(registry.get(" Clarifai ").map(|p| p.id()), Some("clarifai"));
        assert!(registry.get("aws-rekognition").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = all_providers();
        registry.register(Arc::new(
            GoogleVision::new().with_base_url("http://localhost:1"),
        ));
        assert_eq!(registry.ids(), vec!["clarifai", "azure", "google"]);
    }
}
