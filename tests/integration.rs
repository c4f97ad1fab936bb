use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dream_interpreter::{
    ai::{
        ChatService, MockChatClient, MockImageClient, MockStockPhotoClient, PollOutcome,
        StockPhotoService, VendorImageClient,
    },
    config::PollSettings,
    i18n,
    models::{GenerationTask, Language},
    server::{build_router, AppServices, AppState, Settings},
    store::{InMemoryTaskStore, TaskStore},
    Error, Result,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct FailingStore;

#[async_trait]
impl TaskStore for FailingStore {
    async fn upsert(&self, _task: GenerationTask) -> Result<()> {
        Err(Error::Store("store offline".to_string()))
    }

    async fn get(&self, _task_id: &str) -> Result<Option<GenerationTask>> {
        Err(Error::Store("store offline".to_string()))
    }
}

struct Harness {
    chat: Option<MockChatClient>,
    images: Option<MockImageClient>,
    photos: Option<MockStockPhotoClient>,
    tasks: Arc<dyn TaskStore>,
    settings: Settings,
}

impl Harness {
    fn new() -> Self {
        Self {
            chat: Some(MockChatClient::new()),
            images: Some(MockImageClient::new()),
            photos: Some(MockStockPhotoClient::new()),
            tasks: Arc::new(InMemoryTaskStore::new()),
            settings: Settings {
                callback_url: Some("https://dreams.test/api/4oimage-callback".to_string()),
                poll: PollSettings {
                    attempts: 3,
                    interval: Duration::from_millis(1),
                    query_timeout: Duration::from_secs(1),
                },
                static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
            },
        }
    }

    fn router(&self) -> Router {
        let services = AppServices {
            chat: self
                .chat
                .clone()
                .map(|c| Arc::new(c) as Arc<dyn ChatService>),
            images: self
                .images
                .clone()
                .map(|c| Arc::new(c) as Arc<dyn VendorImageClient>),
            photos: self
                .photos
                .clone()
                .map(|c| Arc::new(c) as Arc<dyn StockPhotoService>),
            tasks: self.tasks.clone(),
        };
        build_router(AppState::with_services(services, self.settings.clone()))
    }
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body)).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None).await
}

async fn post_raw(
    router: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_analysis_succeeds_in_every_language() {
    let harness = Harness::new();
    let chat = harness.chat.clone().unwrap();

    for (code, expected) in [("en", Language::En), ("zh", Language::Zh), ("es", Language::Es)] {
        let (status, body) = post(
            harness.router(),
            "/api/analyze-dream",
            json!({ "dream": "I was flying over the sea", "language": code }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["analysis"],
            json!("An interpretation of: I was flying over the sea")
        );
        assert_eq!(chat.last_language(), Some(expected));
    }
    assert_eq!(chat.get_call_count(), 3);
}

#[tokio::test]
async fn test_analysis_rejects_blank_dream_with_localized_message() {
    let harness = Harness::new();

    for (code, language) in [
        ("en", Language::En),
        ("zh", Language::Zh),
        ("es", Language::Es),
        ("fr", Language::En),
    ] {
        let (status, body) = post(
            harness.router(),
            "/api/analyze-dream",
            json!({ "dream": "   ", "language": code }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!(i18n::translate(language, "analysis.error.empty_dream"))
        );
    }
    assert_eq!(harness.chat.unwrap().get_call_count(), 0);
}

#[tokio::test]
async fn test_analysis_maps_vendor_rate_limit_and_bad_key() {
    let mut harness = Harness::new();

    harness.chat = Some(MockChatClient::new().with_vendor_status(429));
    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "a storm", "language": "zh" }),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], json!("请求过于频繁，请稍后重试"));

    harness.chat = Some(MockChatClient::new().with_vendor_status(401));
    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "a storm" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        json!("Invalid API key, please check configuration")
    );

    harness.chat = Some(MockChatClient::new().with_vendor_status(503));
    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "a storm", "language": "es" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        json!(i18n::translate(Language::Es, "analysis.error.failed"))
    );
}

#[tokio::test]
async fn test_analysis_without_key_fails_closed() {
    let mut harness = Harness::new();
    harness.chat = None;

    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "a storm" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("DeepSeek API key not configured"));
}

#[tokio::test]
async fn test_image_primary_returns_substitute_and_caches_processing_task() {
    let mut harness = Harness::new();
    let images = MockImageClient::new().with_task_id("abcdef1234567890".to_string());
    harness.images = Some(images.clone());

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "我在花园里飞翔", "analysis": "...", "language": "zh" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("4oimageapi.io-preset-healing"));
    assert_eq!(body["taskId"], json!("abcdef1234567890"));
    assert!(body["imageUrl"].as_str().unwrap().starts_with("https://"));
    assert!(body["message"].as_str().unwrap().contains("abcdef12"));

    let prompt = images.last_prompt().unwrap();
    assert!(prompt.contains("flying through the sky"));
    assert!(!prompt.contains("花园"));
    assert_eq!(
        images.last_callback().as_deref(),
        Some("https://dreams.test/api/4oimage-callback")
    );

    let cached = harness.tasks.get("abcdef1234567890").await.unwrap().unwrap();
    assert_eq!(cached.image_url, None);
    assert_eq!(cached.source.as_deref(), Some("4oimageapi.io"));
}

#[tokio::test]
async fn test_image_falls_back_to_stock_photo() {
    let mut harness = Harness::new();
    let photos = MockStockPhotoClient::new().with_url("https://photos.test/ocean.jpg".to_string());
    harness.images = Some(MockImageClient::new().with_submit_failure("no taskId".to_string()));
    harness.photos = Some(photos.clone());

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "Soñé con el mar y el agua", "language": "es" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("unsplash"));
    assert_eq!(body["imageUrl"], json!("https://photos.test/ocean.jpg"));
    assert_eq!(
        body["message"],
        json!(i18n::translate(Language::Es, "image.message.fallback"))
    );
    assert_eq!(body.get("taskId"), None);
    assert_eq!(photos.get_queries(), vec!["calm ocean healing water".to_string()]);
}

#[tokio::test]
async fn test_image_without_any_vendor_returns_preset() {
    let mut harness = Harness::new();
    harness.images = None;
    harness.photos = None;

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "a quiet room" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("preset"));
    assert!(body["imageUrl"].as_str().unwrap().starts_with("https://"));
    assert_eq!(
        body["message"],
        json!(i18n::translate(Language::En, "image.message.preset"))
    );
}

#[tokio::test]
async fn test_image_preset_when_every_tier_fails() {
    let mut harness = Harness::new();
    harness.images = Some(MockImageClient::new().with_submit_failure("HTTP 500".to_string()));
    harness.photos = Some(MockStockPhotoClient::new().failing());

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "a quiet room", "language": "zh" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("preset"));
}

#[tokio::test]
async fn test_image_rejects_blank_dream() {
    let harness = Harness::new();

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "language": "es" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("La descripción del sueño no puede estar vacía")
    );
    assert_eq!(harness.images.unwrap().get_submit_count(), 0);
}

#[tokio::test]
async fn test_image_store_failure_is_a_localized_500() {
    let mut harness = Harness::new();
    harness.tasks = Arc::new(FailingStore);

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "a quiet room", "language": "zh" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        json!(i18n::translate(Language::Zh, "image.error.unavailable"))
    );
    assert_eq!(
        body["message"],
        json!(i18n::translate(Language::Zh, "image.message.continue"))
    );
}

#[tokio::test]
async fn test_callback_then_result_is_served_from_cache() {
    let harness = Harness::new();
    let images = harness.images.clone().unwrap();

    let (status, body) = post(
        harness.router(),
        "/api/4oimage-callback",
        json!({ "taskId": "t-42", "imageUrl": "https://cdn.test/t-42.png", "status": "completed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, body) = get(harness.router(), "/api/4oimage-result/t-42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["result"]["imageUrl"], json!("https://cdn.test/t-42.png"));
    assert_eq!(body["result"]["status"], json!("completed"));
    assert_eq!(body["result"]["source"], json!("callback"));
    assert_eq!(images.get_poll_count(), 0);
}

#[tokio::test]
async fn test_callback_acknowledges_unrecognized_bodies() {
    let harness = Harness::new();

    let (status, body) = post(harness.router(), "/api/4oimage-callback", json!({ "foo": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, _) = post(harness.router(), "/api/4oimage-callback", json!([1, 2, 3])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_callback_swallows_store_failure() {
    let mut harness = Harness::new();
    harness.tasks = Arc::new(FailingStore);

    let (status, body) = post(
        harness.router(),
        "/api/4oimage-callback",
        json!({ "taskId": "t-1", "imageUrl": "https://cdn.test/t-1.png" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_result_polls_on_cache_miss_and_caches_success() {
    let mut harness = Harness::new();
    let images = MockImageClient::new()
        .with_poll_outcome(PollOutcome::Ready("https://cdn.test/polled.png".to_string()));
    harness.images = Some(images.clone());

    let (status, body) = get(harness.router(), "/api/4oimage-result/t-7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["result"]["imageUrl"], json!("https://cdn.test/polled.png"));
    assert_eq!(body["result"]["source"], json!("active-polling"));
    assert_eq!(images.get_poll_count(), 1);

    let cached = harness.tasks.get("t-7").await.unwrap().unwrap();
    assert_eq!(cached.image_url.as_deref(), Some("https://cdn.test/polled.png"));

    let (_, body) = get(harness.router(), "/api/4oimage-result/t-7").await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(images.get_poll_count(), 1);
}

#[tokio::test]
async fn test_result_not_yet_available() {
    let mut harness = Harness::new();
    harness.images = Some(
        MockImageClient::new().with_poll_outcome(PollOutcome::Pending("processing".to_string())),
    );
    harness
        .tasks
        .upsert(GenerationTask::processing("t-9"))
        .await
        .unwrap();

    let (status, body) = get(harness.router(), "/api/4oimage-result/t-9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["taskId"], json!("t-9"));
    assert_eq!(body["result"]["status"], json!("processing"));
    assert_eq!(body["message"], json!("Task result not yet available"));
}

#[tokio::test]
async fn test_poll_reports_each_outcome() {
    let mut harness = Harness::new();
    harness.images = Some(
        MockImageClient::new()
            .with_poll_outcome(PollOutcome::Pending("running".to_string()))
            .with_poll_outcome(PollOutcome::Failed),
    );

    let (status, body) = get(harness.router(), "/api/poll-4oimage/t-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status"], json!("running"));

    let (_, body) = get(harness.router(), "/api/poll-4oimage/t-3").await;
    assert_eq!(body["status"], json!("failed"));
    let cached = harness.tasks.get("t-3").await.unwrap().unwrap();
    assert_eq!(serde_json::to_value(cached.status).unwrap(), json!("failed"));

    harness.images = None;
    let (status, body) = get(harness.router(), "/api/poll-4oimage/t-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Unable to query task status - all endpoints failed")
    );
}

#[tokio::test]
async fn test_poll_success_is_cached() {
    let mut harness = Harness::new();
    harness.images = Some(
        MockImageClient::new().with_poll_outcome(PollOutcome::Ready("https://cdn.test/a.png".to_string())),
    );

    let (_, body) = get(harness.router(), "/api/poll-4oimage/t-5").await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["imageUrl"], json!("https://cdn.test/a.png"));
    assert_eq!(body["source"], json!("polling"));

    let cached = harness.tasks.get("t-5").await.unwrap().unwrap();
    assert_eq!(cached.source.as_deref(), Some("4oimageapi.io-polling"));
}

#[tokio::test]
async fn test_test_callback_stores_completed_task() {
    let harness = Harness::new();

    let (status, body) = post(harness.router(), "/api/test-callback/t-11", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("test-callback"));

    let (_, body) = get(harness.router(), "/api/4oimage-result/t-11").await;
    assert_eq!(body["success"], json!(true));
    assert!(body["result"]["imageUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://picsum.photos/"));
}

#[tokio::test]
async fn test_debug_image_waits_for_result() {
    let mut harness = Harness::new();
    let images = MockImageClient::new()
        .with_task_id("debug-1".to_string())
        .with_poll_outcome(PollOutcome::Pending("processing".to_string()))
        .with_poll_outcome(PollOutcome::Ready("https://cdn.test/debug.png".to_string()));
    harness.images = Some(images.clone());

    let (status, body) = post(harness.router(), "/api/debug-4oimage", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["taskId"], json!("debug-1"));
    assert_eq!(body["imageUrl"], json!("https://cdn.test/debug.png"));
    assert_eq!(images.get_poll_count(), 2);
    assert_eq!(images.last_callback(), None);
}

#[tokio::test]
async fn test_debug_image_gives_up_after_attempts() {
    let mut harness = Harness::new();
    let images = MockImageClient::new()
        .with_poll_outcome(PollOutcome::Pending("processing".to_string()));
    harness.images = Some(images.clone());

    let (status, body) = post(harness.router(), "/api/debug-4oimage", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status"], json!("processing"));
    assert_eq!(images.get_poll_count(), 3);
}

#[tokio::test]
async fn test_health_reports_configured_features() {
    let mut harness = Harness::new();
    harness.photos = None;

    let (status, body) = get(harness.router(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(
        body["features"]["dreamAnalysis"],
        json!("available (DeepSeek API)")
    );
    assert!(body["features"]["stockPhotos"]
        .as_str()
        .unwrap()
        .starts_with("disabled"));
}

#[tokio::test]
async fn test_translations_fall_back_to_english() {
    let harness = Harness::new();

    let (status, zh) = get(harness.router(), "/api/translations/zh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        zh["analysis.error.empty_dream"],
        json!("梦境描述不能为空")
    );

    let (_, fr) = get(harness.router(), "/api/translations/fr").await;
    let (_, en) = get(harness.router(), "/api/translations/en").await;
    assert_eq!(fr, en);
}

#[tokio::test]
async fn test_gallery_lists_samples() {
    let harness = Harness::new();

    let (status, body) = get(harness.router(), "/api/gallery").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["fallbackImage"].as_str().unwrap().starts_with("https://"));
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["date"], json!("2024-01-06"));
}

#[tokio::test]
async fn test_static_shell_is_served() {
    let harness = Harness::new();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = harness.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.contains("<html"));
    // The final image replaces the substitute's gallery entry.
    assert!(!page.contains("addToGallery(dream, finalUrl"));
    assert!(page.contains("galleryImage.src = finalUrl"));
}

#[tokio::test]
async fn test_analysis_passes_dream_text_as_sent() {
    let harness = Harness::new();

    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "  flying  " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], json!("An interpretation of:   flying  "));
}

#[tokio::test]
async fn test_analysis_numeric_language_falls_back_to_english() {
    let harness = Harness::new();
    let chat = harness.chat.clone().unwrap();

    let (status, body) = post(
        harness.router(),
        "/api/analyze-dream",
        json!({ "dream": "x", "language": 123 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], json!("An interpretation of: x"));
    assert_eq!(chat.last_language(), Some(Language::En));
}

#[tokio::test]
async fn test_image_accepts_numeric_analysis() {
    let harness = Harness::new();

    let (status, body) = post(
        harness.router(),
        "/api/generate-image",
        json!({ "dream": "x", "analysis": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("4oimageapi.io-preset-healing"));
}

#[tokio::test]
async fn test_unreadable_bodies_get_localized_json_errors() {
    let harness = Harness::new();

    let (status, body) = post_raw(
        harness.router(),
        "/api/analyze-dream",
        Some("application/json"),
        "{not json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Dream description cannot be empty"));

    let (status, body) = post_raw(
        harness.router(),
        "/api/generate-image",
        None,
        r#"{"dream": "x"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!(i18n::translate(Language::En, "image.error.empty_dream"))
    );
    assert_eq!(harness.images.unwrap().get_submit_count(), 0);
}

#[tokio::test]
async fn test_callback_without_content_type_is_stored() {
    let harness = Harness::new();

    let (status, body) = post_raw(
        harness.router(),
        "/api/4oimage-callback",
        None,
        r#"{"taskId": "t-20", "imageUrl": "https://cdn.test/t-20.png"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let cached = harness.tasks.get("t-20").await.unwrap().unwrap();
    assert_eq!(cached.image_url.as_deref(), Some("https://cdn.test/t-20.png"));

    let (status, body) = post_raw(harness.router(), "/api/4oimage-callback", None, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}
