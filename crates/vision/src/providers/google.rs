//! Google Cloud Vision provider implementation.
//!
//! One `images:annotate` call requests label detection, text detection,
//! image properties (dominant colors) and object localization.

use {
    async_trait::async_trait,
    base64::Engine,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::json,
    tracing::debug,
};

use crate::{
    error::{VisionError, send},
    types::{AnalyzeRequest, Label, VisionOutput, VisionProvider},
};

/// Google Cloud Vision API base URL.
const API_BASE: &str = "https://vision.googleapis.com";

const PROVIDER_ID: &str = "google";

/// Keeps the key out of the request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

const MAX_LABELS: u32 = 10;
const MAX_OBJECTS: u32 = 10;

/// Number of dominant colors reduced into buckets.
const TOP_COLORS: usize = 3;

/// Google Cloud Vision provider.
#[derive(Debug, Clone)]
pub struct GoogleVision {
    client: Client,
    base_url: String,
}

impl Default for GoogleVision {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleVision {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VisionProvider for GoogleVision {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn name(&self) -> &'static str {
        "Google Cloud Vision"
    }

    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        credential: &Secret<String>,
    ) -> Result<VisionOutput, VisionError> {
        let content = base64::engine::general_purpose::STANDARD.encode(&request.image);
        let body = json!({
            "requests": [{
                "image": { "content": content },
                "features": [
                    { "type": "LABEL_DETECTION", "maxResults": MAX_LABELS },
                    { "type": "TEXT_DETECTION" },
                    { "type": "IMAGE_PROPERTIES" },
                    { "type": "OBJECT_LOCALIZATION", "maxResults": MAX_OBJECTS },
                ],
            }],
        });

        let url = format!("{}/v1/images:annotate", self.base_url);
        let response = send(
            PROVIDER_ID,
            self.client
                .post(&url)
                .header(API_KEY_HEADER, credential.expose_secret())
                .json(&body),
        )
        .await?;

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|source| VisionError::Parse {
                provider: PROVIDER_ID,
                source: source.without_url(),
            })?;

        let annotation = parsed.responses.into_iter().next().unwrap_or_default();
        if let Some(error) = annotation.error {
            return Err(VisionError::Api {
                provider: PROVIDER_ID,
                message: format!("{} (code {})", error.message, error.code),
            });
        }

        let output = annotation.into_output();
        debug!(
            labels = output.labels.len(),
            objects = output.objects.len(),
            "google vision analysis complete"
        );
        Ok(output)
    }
}

/// Reduce an RGB color to the dominant channel, or `neutral` when no
/// channel strictly exceeds both others.
fn color_bucket(color: &RgbColor) -> &'static str {
    let (r, g, b) = (color.red, color.green, color.blue);
    if r > g && r > b {
        "red"
    } else if g > r && g > b {
        "green"
    } else if b > r && b > g {
        "blue"
    } else {
        "neutral"
    }
}

// ── API Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    image_properties_annotation: Option<ImageProperties>,
    #[serde(default)]
    localized_object_annotations: Vec<LocalizedObject>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

impl AnnotateImageResponse {
    fn into_output(self) -> VisionOutput {
        let labels = self
            .label_annotations
            .into_iter()
            .map(|a| Label::new(a.description, a.score))
            .collect();

        // The first text annotation holds the full detected text block.
        let extracted_text = self
            .text_annotations
            .into_iter()
            .next()
            .map(|a| a.description)
            .unwrap_or_default();

        let colors = self
            .image_properties_annotation
            .and_then(|p| p.dominant_colors)
            .map(|d| {
                d.colors
                    .iter()
                    .take(TOP_COLORS)
                    .map(|c| color_bucket(&c.color).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let objects = self
            .localized_object_annotations
            .into_iter()
            .map(|o| o.name)
            .collect();

        VisionOutput {
            labels,
            caption: None,
            extracted_text,
            colors,
            objects,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    #[serde(default)]
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
struct ColorInfo {
    #[serde(default)]
    color: RgbColor,
}

/// Channels are omitted by the API when zero.
#[derive(Debug, Default, Deserialize)]
struct RgbColor {
    #[serde(default)]
    red: f32,
    #[serde(default)]
    green: f32,
    #[serde(default)]
    blue: f32,
}

#[derive(Debug, Deserialize)]
struct LocalizedObject {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}
