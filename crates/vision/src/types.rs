use {
    async_trait::async_trait,
    bytes::Bytes,
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

use crate::error::VisionError;

/// A descriptive tag for an image with the provider's confidence.
///
/// Confidence is provider-native and not comparable across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub confidence: f32,
}

impl Label {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Image submitted for analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub image: Bytes,
    /// Declared MIME type from the upload, e.g. `image/jpeg`.
    pub mime_type: String,
}

/// Normalized provider output.
///
/// Fields a provider cannot produce are left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionOutput {
    /// Label pool handed to category scoring.
    pub labels: Vec<Label>,
    /// Caption, when the provider generates one.
    pub caption: Option<String>,
    pub extracted_text: String,
    /// Dominant color buckets: `red`, `green`, `blue` or `neutral`.
    pub colors: Vec<String>,
    pub objects: Vec<String>,
}

/// Image analysis capability (Google Cloud Vision, Clarifai, Azure, ...).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider identifier (e.g. "google", "clarifai", "azure").
    fn id(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Analyze an image with the given credential.
    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        credential: &Secret<String>,
    ) -> Result<VisionOutput, VisionError>;
}
