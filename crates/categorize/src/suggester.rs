//! Category suggestion service.
//!
//! Stages run in order: vocabulary, provider + credential resolution,
//! provider call, result assembly. Each stage absorbs its own failures and
//! anything that cannot complete produces [`AnalysisResult::fallback`].

use std::sync::Arc;

use {
    bytes::Bytes,
    darkroom_config::DarkroomConfig,
    darkroom_store::{CategorySource, SettingsStore},
    darkroom_vision::{
        AnalyzeRequest, AzureVision, ClarifaiVision, GoogleVision, ProviderRegistry,
        VisionOutput, VisionProvider,
    },
    secrecy::Secret,
    tracing::{debug, info, warn},
};

use crate::{
    builtin::BUILTIN_TABLE_VERSION,
    credentials::{CredentialResolver, PROVIDER_KEY},
    result::AnalysisResult,
    scoring::{DEFAULT_MAX_SUGGESTIONS, score_categories, top_suggestions},
    vocabulary::VocabularyReader,
};

/// One image submitted for categorization.
#[derive(Clone)]
pub struct AnalysisRequest {
    pub image: Bytes,
    pub mime_type: String,
    /// Provider id overriding settings, environment and config.
    pub provider: Option<String>,
    /// Credential overriding settings and environment.
    pub credential: Option<Secret<String>>,
}

impl std::fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("image_bytes", &self.image.len())
            .field("mime_type", &self.mime_type)
            .field("provider", &self.provider)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AnalysisRequest {
    pub fn new(image: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            mime_type: mime_type.into(),
            provider: None,
            credential: None,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Secret<String>) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Suggests categories for uploaded images.
pub struct CategorySuggester {
    registry: ProviderRegistry,
    vocabulary: VocabularyReader,
    credentials: CredentialResolver,
    default_provider: String,
    max_suggestions: usize,
}

impl std::fmt::Debug for CategorySuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategorySuggester")
            .field("registry", &self.registry)
            .field("credentials", &self.credentials)
            .field("default_provider", &self.default_provider)
            .field("max_suggestions", &self.max_suggestions)
            .finish()
    }
}

impl CategorySuggester {
    pub fn new(
        registry: ProviderRegistry,
        vocabulary: VocabularyReader,
        credentials: CredentialResolver,
    ) -> Self {
        Self {
            registry,
            vocabulary,
            credentials,
            default_provider: "google".into(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Build from configuration: enabled providers with their endpoint
    /// overrides, settings-then-environment credentials.
    pub fn from_config(
        config: &DarkroomConfig,
        categories: Arc<dyn CategorySource>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self::new(
            registry_from_config(config),
            VocabularyReader::new(categories),
            CredentialResolver::standard(settings),
        )
        .with_default_provider(config.analysis.provider.clone())
        .with_max_suggestions(config.analysis.effective_max_suggestions())
    }

    #[must_use]
    pub fn with_default_provider(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = provider.into();
        self
    }

    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max.max(1);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn vocabulary(&self) -> &VocabularyReader {
        &self.vocabulary
    }

    /// Analyze one image. Never fails; see [`AnalysisResult::fallback`].
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult {
        if request.image.is_empty() {
            warn!("empty image, skipping analysis");
            return AnalysisResult::fallback();
        }

        let vocabulary = self.vocabulary.fetch_custom_categories().await;

        let provider_id = self
            .credentials
            .resolve_value(request.provider.as_deref(), PROVIDER_KEY)
            .await
            .unwrap_or_else(|| self.default_provider.clone());

        let Some(provider) = self.registry.get(&provider_id) else {
            warn!(provider = %provider_id, "unknown vision provider, using fallback result");
            return AnalysisResult::fallback();
        };

        let Some(credential) = self
            .credentials
            .resolve_credential(request.credential.clone(), provider.id())
            .await
        else {
            debug!(provider = provider.id(), "no credential configured, using fallback result");
            return AnalysisResult::fallback();
        };

        let output = match self.invoke(provider, &request, &credential).await {
            Some(output) => output,
            None => return AnalysisResult::fallback(),
        };

        let texts: Vec<&str> = output.labels.iter().map(|l| l.text.as_str()).collect();
        let matches = score_categories(&texts, &vocabulary);
        let suggestions = top_suggestions(&matches, self.max_suggestions);

        let result = AnalysisResult::assemble(output, suggestions, matches);
        info!(
            provider = provider.id(),
            category = %result.suggested_category,
            labels = result.labels.len(),
            custom_categories = vocabulary.len(),
            builtin_table = BUILTIN_TABLE_VERSION,
            "image analyzed"
        );
        result
    }

    /// Single provider call, no retry.
    async fn invoke(
        &self,
        provider: &dyn VisionProvider,
        request: &AnalysisRequest,
        credential: &Secret<String>,
    ) -> Option<VisionOutput> {
        let analyze = AnalyzeRequest {
            image: request.image.clone(),
            mime_type: request.mime_type.clone(),
        };
        debug!(
            provider = provider.id(),
            mime_type = %analyze.mime_type,
            bytes = analyze.image.len(),
            "calling vision provider"
        );

        match provider.analyze(&analyze, credential).await {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(
                    provider = provider.id(),
                    status = ?e.status(),
                    error = %e,
                    "vision provider failed, using fallback result"
                );
                None
            },
        }
    }
}

fn registry_from_config(config: &DarkroomConfig) -> ProviderRegistry {
    let providers = &config.providers;
    let mut registry = ProviderRegistry::new();

    if providers.is_enabled("google") {
        let mut google = GoogleVision::new();
        if let Some(url) = providers.base_url("google") {
            google = google.with_base_url(url);
        }
        registry.register(Arc::new(google));
    }
    if providers.is_enabled("clarifai") {
        let mut clarifai = ClarifaiVision::new();
        if let Some(url) = providers.base_url("clarifai") {
            clarifai = clarifai.with_base_url(url);
        }
        registry.register(Arc::new(clarifai));
    }
    if providers.is_enabled("azure") {
        // The endpoint is part of the credential.
        if let Some(url) = providers.base_url("azure") {
            debug!(
                base_url = url,
                "ignoring providers.azure.base_url, set azure_vision_endpoint instead"
            );
        }
        registry.register(Arc::new(AzureVision::new()));
    }

    registry
}
