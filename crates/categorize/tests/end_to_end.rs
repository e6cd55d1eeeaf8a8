//! Full pipeline against an in-memory content store and a mocked Google
//! Cloud Vision endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use {
    darkroom_categorize::{AnalysisRequest, AnalysisResult, CategorySuggester},
    darkroom_config::{DarkroomConfig, ProviderEntry},
    darkroom_store::{SettingsStore, SqliteCategorySource, SqliteSettingsStore, schema},
    serde_json::json,
    wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    },
};

async fn content_store() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    schema::init(&pool).await.unwrap();
    sqlx::query(
        "INSERT INTO galleries (title, category) VALUES
            ('Lakes', 'Nature, Wildlife'), ('Summer', 'Wedding')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO portfolio_items (title, category) VALUES ('Peaks', 'Alpine')")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

fn config(google_url: &str) -> DarkroomConfig {
    let mut config = DarkroomConfig::default();
    config
        .providers
        .providers
        .insert("google".into(), ProviderEntry {
            enabled: true,
            base_url: Some(google_url.into()),
        });
    config
}

async fn suggester(pool: sqlx::SqlitePool, google_url: &str) -> CategorySuggester {
    let settings = SqliteSettingsStore::new(pool.clone());
    settings.set("vision_provider", "google").await.unwrap();
    settings
        .set("google_vision_api_key", "settings-key")
        .await
        .unwrap();

    CategorySuggester::from_config(
        &config(google_url),
        Arc::new(SqliteCategorySource::new(pool)),
        Arc::new(settings),
    )
}

#[tokio::test]
async fn labels_reconciled_against_store_vocabulary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("x-goog-api-key", "settings-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "labelAnnotations": [
                    { "description": "Nature", "score": 0.98 },
                    { "description": "Alpine lake", "score": 0.93 },
                    { "description": "Mountain", "score": 0.9 },
                    { "description": "Forest", "score": 0.85 }
                ],
                "imagePropertiesAnnotation": {
                    "dominantColors": { "colors": [
                        { "color": { "red": 30, "green": 120, "blue": 40 } }
                    ]}
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let svc = suggester(content_store().await, &server.uri()).await;
    let result = svc
        .analyze(AnalysisRequest::new(&b"jpeg bytes"[..], "image/jpeg"))
        .await;

    assert!(result.analysis_succeeded);
    // Custom "Nature" exact match outranks everything.
    assert_eq!(result.suggested_category, "Nature");
    assert_eq!(result.suggested_category_matches[0].score, 100);
    // "alpine lake" contains the custom "Alpine".
    assert!(result.suggested_categories.contains(&"Alpine".to_string()));
    assert_eq!(result.colors, vec!["green"]);
    assert!(result.description.starts_with("Detected: Nature"));
}

#[tokio::test]
async fn provider_outage_yields_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let svc = suggester(content_store().await, &server.uri()).await;
    let result = svc
        .analyze(AnalysisRequest::new(&b"jpeg bytes"[..], "image/jpeg"))
        .await;

    assert_eq!(result, AnalysisResult::fallback());
}
