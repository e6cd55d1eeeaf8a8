//! Azure Computer Vision provider implementation.
//!
//! The credential is a composite `endpoint|key` string. Azure mixes tags,
//! captions, objects and scene categories without a clean split between
//! "labels" and the rest, so all four feed the label pool.

use {
    async_trait::async_trait,
    reqwest::{Client, Url, header::CONTENT_TYPE},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{
    error::{VisionError, send},
    types::{AnalyzeRequest, Label, VisionOutput, VisionProvider},
};

const PROVIDER_ID: &str = "azure";

const API_PATH: &str = "vision/v3.2/analyze";

const VISUAL_FEATURES: &str = "Tags,Description,Objects,Categories";

/// Separator between endpoint and key in the composite credential.
pub const CREDENTIAL_SEPARATOR: char = '|';

/// Azure Computer Vision provider.
#[derive(Debug, Clone)]
pub struct AzureVision {
    client: Client,
}

impl Default for AzureVision {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureVision {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

/// Split `endpoint|key` and reduce the endpoint to scheme, host and port.
fn parse_credential(credential: &str) -> Result<(String, &str), VisionError> {
    let invalid = |reason: &str| VisionError::InvalidCredential {
        provider: PROVIDER_ID,
        reason: reason.to_string(),
    };

    let (endpoint, key) = credential
        .split_once(CREDENTIAL_SEPARATOR)
        .ok_or_else(|| invalid("expected `endpoint|key`"))?;
    let (endpoint, key) = (endpoint.trim(), key.trim());
    if endpoint.is_empty() || key.is_empty() {
        return Err(invalid("endpoint and key must both be non-empty"));
    }

    let url = Url::parse(endpoint).map_err(|e| invalid(&format!("bad endpoint URL: {e}")))?;
    if url.host_str().is_none() {
        return Err(invalid("endpoint URL has no host"));
    }

    Ok((url.origin().ascii_serialization(), key))
}

/// `outdoor_mountain` -> `outdoor mountain`, `people_` -> `people`.
fn category_label(name: &str) -> String {
    name.replace('_', " ").trim().to_string()
}

#[async_trait]
impl VisionProvider for AzureVision {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn name(&self) -> &'static str {
        "Azure Computer Vision"
    }

    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        credential: &Secret<String>,
    ) -> Result<VisionOutput, VisionError> {
        let (endpoint, key) = parse_credential(credential.expose_secret())?;

        let url = format!("{endpoint}/{API_PATH}");
        let response = send(
            PROVIDER_ID,
            self.client
                .post(&url)
                .query(&[("visualFeatures", VISUAL_FEATURES)])
                .header("Ocp-Apim-Subscription-Key", key)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(request.image.clone()),
        )
        .await?;

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|source| VisionError::Parse {
                provider: PROVIDER_ID,
                source: source.without_url(),
            })?;

        let output = parsed.into_output();
        debug!(labels = output.labels.len(), "azure analysis complete");
        Ok(output)
    }
}

// ── API Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    objects: Vec<DetectedObject>,
    #[serde(default)]
    categories: Vec<Category>,
}

impl AnalyzeResponse {
    fn into_output(self) -> VisionOutput {
        let captions = self.description.map(|d| d.captions).unwrap_or_default();
        let caption = captions.first().map(|c| c.text.clone());
        let objects: Vec<String> = self.objects.iter().map(|o| o.object.clone()).collect();

        let labels = self
            .tags
            .into_iter()
            .map(|t| Label::new(t.name, t.confidence))
            .chain(captions.into_iter().map(|c| Label::new(c.text, c.confidence)))
            .chain(
                self.objects
                    .into_iter()
                    .map(|o| Label::new(o.object, o.confidence)),
            )
            .chain(
                self.categories
                    .into_iter()
                    .map(|c| Label::new(category_label(&c.name), c.score)),
            )
            .filter(|l| !l.text.is_empty())
            .collect();

        VisionOutput {
            labels,
            caption,
            extracted_text: String::new(),
            colors: Vec::new(),
            objects,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct Description {
    #[serde(default)]
    captions: Vec<Caption>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    text: String,
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct DetectedObject {
    object: String,
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct Category {
    name: String,
    #[serde(default)]
    score: f32,
}
