//! Clarifai provider implementation.
//!
//! Runs the general image recognition model. Clarifai returns concepts
//! only, so text and color extraction stay empty and the leading concepts
//! double as the object list.

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

/// Clarifai API base URL.
const API_BASE: &str = "https://api.clarifai.com";

/// Public general concept model.
const DEFAULT_MODEL: &str = "general-image-recognition";

const PROVIDER_ID: &str = "clarifai";

/// Clarifai's success status code inside a 2xx body.
const STATUS_SUCCESS: u32 = 10000;

/// Concepts copied into `objects`.
const MAX_OBJECTS: usize = 5;

/// Clarifai concept model provider.
#[derive(Debug, Clone)]
pub struct ClarifaiVision {
    client: Client,
    base_url: String,
    model: String,
}

impl Default for ClarifaiVision {
    fn default() -> Self {
        Self::new()
    }
}

impl ClarifaiVision {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl VisionProvider for ClarifaiVision {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn name(&self) -> &'static str {
        "Clarifai"
    }

    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        credential: &Secret<String>,
    ) -> Result<VisionOutput, VisionError> {
        let content = base64::engine::general_purpose::STANDARD.encode(&request.image);
        let body = json!({
            "inputs": [{ "data": { "image": { "base64": content } } }],
        });

        let url = format!("{}/v2/models/{}/outputs", self.base_url, self.model);
        let response = send(
            PROVIDER_ID,
            self.client
                .post(&url)
                .header(
                    "Authorization",
                    format!("Key {}", credential.expose_secret()),
                )
                .json(&body),
        )
        .await?;

        let parsed: OutputsResponse = response
            .json()
            .await
            .map_err(|source| VisionError::Parse {
                provider: PROVIDER_ID,
                source: source.without_url(),
            })?;

        if let Some(status) = parsed.status.as_ref()
            && status.code != STATUS_SUCCESS
        {
            return Err(VisionError::Api {
                provider: PROVIDER_ID,
                message: format!("{} (code {})", status.description, status.code),
            });
        }

        let concepts = parsed
            .outputs
            .into_iter()
            .next()
            .and_then(|o| o.data)
            .map(|d| d.concepts)
            .unwrap_or_default();

        let objects = concepts
            .iter()
            .take(MAX_OBJECTS)
            .map(|c| c.name.clone())
            .collect();
        let labels: Vec<Label> = concepts
            .into_iter()
            .map(|c| Label::new(c.name, c.value))
            .collect();

        debug!(labels = labels.len(), "clarifai analysis complete");
        Ok(VisionOutput {
            labels,
            caption: None,
            extracted_text: String::new(),
            colors: Vec::new(),
            objects,
        })
    }
}

// ── API Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OutputsResponse {
    #[serde(default)]
    status: Option<ClarifaiStatus>,
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Debug, Deserialize)]
struct ClarifaiStatus {
    code: u32,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Output {
    #[serde(default)]
    data: Option<OutputData>,
}

#[derive(Debug, Deserialize)]
struct OutputData {
    #[serde(default)]
    concepts: Vec<Concept>,
}

#[derive(Debug, Deserialize)]
struct Concept {
    name: String,
    #[serde(default)]
    value: f32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        bytes::Bytes,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{header, method, path},
        },
    };

    fn request() -> AnalyzeRequest {
        AnalyzeRequest {
            image: Bytes::from_static(b"fake png"),
            mime_type: "image/png".into(),
        }
    }

    fn concepts(names: &[&str]) -> serde_json::Value {
        let concepts: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "name": name, "value": 0.99 - i as f64 * 0.01 }))
            .collect();
        json!({
            "status": { "code": 10000, "description": "Ok" },
            "outputs": [{ "data": { "concepts": concepts } }]
        })
    }

    #[tokio::test]
    async fn test_concepts_become_labels_and_objects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/models/general-image-recognition/outputs"))
            .and(header("Authorization", "Key clarifai-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(concepts(&[
                "dog", "pet", "animal", "grass", "outdoors", "cute", "puppy",
            ])))
            .mount(&server)
            .await;

        let provider = ClarifaiVision::new().with_base_url(server.uri());
        let output = provider
            .analyze(&request(), &Secret::new("clarifai-key".into()))
            .await
            .unwrap();

        assert_eq!(output.labels.len(), 7);
        assert_eq!(output.labels[0].text, "dog");
        assert_eq!(output.objects, vec![
            "dog", "pet", "animal", "grass", "outdoors"
        ]);
        assert!(output.colors.is_empty());
        assert!(output.extracted_text.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let provider = ClarifaiVision::new().with_base_url(server.uri());
        let err = provider
            .analyze(&request(), &Secret::new("k".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, VisionError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_failure_status_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": { "code": 11102, "description": "Invalid request" },
                "outputs": []
            })))
            .mount(&server)
            .await;

        let provider = ClarifaiVision::new().with_base_url(server.uri());
        let err = provider
            .analyze(&request(), &Secret::new("k".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid request"));
    }

    #[tokio::test]
    async fn test_custom_model_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/models/food-item-recognition/outputs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(concepts(&["pizza"])))
            .mount(&server)
            .await;

        let provider = ClarifaiVision::new()
            .with_base_url(server.uri())
            .with_model("food-item-recognition");
        let output = provider
            .analyze(&request(), &Secret::new("k".into()))
            .await
            .unwrap();
        assert_eq!(output.objects, vec!["pizza"]);
    }
}
