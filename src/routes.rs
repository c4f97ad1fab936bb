//! HTTP handlers for the dream-analysis and image endpoints.
//!
//! Analysis surfaces vendor failures as localized errors. The image pipeline
//! never does: a vendor failure moves on to the next tier, and the last tier
//! always has a curated image to hand back.

use crate::ai::{wait_for_image, PollOutcome};
use crate::error::ApiError;
use crate::gallery::{self, DreamGallery, GalleryItem};
use crate::i18n;
use crate::keywords;
use crate::models::{
    AnalysisRequest, AnalysisResponse, CallbackAck, CallbackPayload, DebugImageResponse,
    GenerationTask, HealthFeatures, HealthResponse, ImageRequest, ImageResponse, Language,
    PollResponse, TaskResultResponse, TaskStatus, TestCallbackResponse,
};
use crate::prompts;
use crate::server::AppState;
use crate::{Error, Result};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Shown while a real generation job is pending.
const SUBSTITUTE_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1518837695005-2083093ee35b?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1469474968028-56623f02e42e?w=800&h=600&fit=crop",
];

/// Last-resort images when no vendor produced anything.
const PRESET_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800&h=600&fit=crop",
];

const SOURCE_PRIMARY: &str = "4oimageapi.io-preset-healing";
const SOURCE_STOCK: &str = "unsplash";
const SOURCE_PRESET: &str = "preset";

const DEBUG_PROMPT: &str = "A beautiful healing image of nature";

fn localized(status: StatusCode, language: Language, key: &str) -> ApiError {
    ApiError::new(status, i18n::translate(language, key))
}

fn pick_image(images: &[&'static str]) -> String {
    images
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(gallery::FALLBACK_IMAGE)
        .to_string()
}

/// Unreadable bodies are handled as empty requests so the caller still gets
/// the localized empty-dream error.
fn body_or_default<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Unreadable request body: {}", rejection.body_text());
            T::default()
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub async fn analyze_dream(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> std::result::Result<Json<AnalysisResponse>, ApiError> {
    let request = body_or_default(payload);
    let language = request.language();

    let Some(dream) = request.dream() else {
        return Err(localized(
            StatusCode::BAD_REQUEST,
            language,
            "analysis.error.empty_dream",
        ));
    };

    let Some(chat) = state.chat.as_ref() else {
        error!("Dream analysis requested but DEEPSEEK_API_KEY is not configured");
        return Err(localized(
            StatusCode::INTERNAL_SERVER_ERROR,
            language,
            "analysis.error.not_configured",
        ));
    };

    info!(language = language.code(), "Analyzing dream");

    match chat.analyze_dream(dream, language).await {
        Ok(analysis) => Ok(Json(AnalysisResponse { analysis })),
        Err(e) => {
            error!("Dream analysis failed: {}", e);
            Err(match e.vendor_status() {
                Some(429) => localized(
                    StatusCode::TOO_MANY_REQUESTS,
                    language,
                    "analysis.error.rate_limited",
                ),
                Some(401) => localized(
                    StatusCode::UNAUTHORIZED,
                    language,
                    "analysis.error.invalid_key",
                ),
                _ => localized(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    language,
                    "analysis.error.failed",
                ),
            })
        }
    }
}

pub async fn generate_image(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ImageRequest>, JsonRejection>,
) -> std::result::Result<Json<ImageResponse>, ApiError> {
    let request = body_or_default(payload);
    let language = request.language();

    let Some(dream) = request.dream() else {
        return Err(localized(
            StatusCode::BAD_REQUEST,
            language,
            "image.error.empty_dream",
        ));
    };

    match image_pipeline(&state, dream, language).await {
        Ok(response) => {
            info!(source = %response.source, "Image response ready");
            Ok(Json(response))
        }
        Err(e) => {
            error!("Image generation failed: {}", e);
            Err(localized(
                StatusCode::INTERNAL_SERVER_ERROR,
                language,
                "image.error.unavailable",
            )
            .with_message(i18n::translate(language, "image.message.continue")))
        }
    }
}

/// Primary vendor job, then stock photo, then a preset image.
async fn image_pipeline(state: &AppState, dream: &str, language: Language) -> Result<ImageResponse> {
    match submit_generation(state, dream, language).await {
        Ok(task_id) => {
            state
                .tasks
                .upsert(GenerationTask::processing(&task_id).with_source("4oimageapi.io"))
                .await?;

            let message = i18n::translate_with(
                language,
                "image.message.pending",
                &[
                    ("task_short", truncate(&task_id, 8).as_str()),
                    ("task_id", task_id.as_str()),
                ],
            );

            return Ok(ImageResponse {
                image_url: pick_image(SUBSTITUTE_IMAGES),
                source: SOURCE_PRIMARY.to_string(),
                message: Some(message),
                task_id: Some(task_id),
            });
        }
        Err(e) => warn!("4oimageapi.io unavailable, trying fallbacks: {}", e),
    }

    if let Some(image_url) = search_stock_photo(state, dream).await {
        return Ok(ImageResponse {
            image_url,
            source: SOURCE_STOCK.to_string(),
            message: Some(i18n::translate(language, "image.message.fallback").to_string()),
            task_id: None,
        });
    }

    Ok(ImageResponse {
        image_url: pick_image(PRESET_IMAGES),
        source: SOURCE_PRESET.to_string(),
        message: Some(i18n::translate(language, "image.message.preset").to_string()),
        task_id: None,
    })
}

async fn submit_generation(state: &AppState, dream: &str, language: Language) -> Result<String> {
    let images = state
        .images
        .as_ref()
        .ok_or_else(|| Error::Config("4oimageapi.io API key not configured".to_string()))?;

    let prompt = prompts::image_prompt(dream, language);
    info!("Submitting image job, prompt: {}...", truncate(&prompt, 100));

    images
        .submit(&prompt, state.settings.callback_url.as_deref())
        .await
}

async fn search_stock_photo(state: &AppState, dream: &str) -> Option<String> {
    let photos = state.photos.as_ref()?;
    let query = keywords::search_term(dream);

    match photos.search(query).await {
        Ok(Some(url)) => Some(url),
        Ok(None) => {
            warn!("Stock photo search for '{}' returned nothing", query);
            None
        }
        Err(e) => {
            warn!("Stock photo search failed: {}", e);
            None
        }
    }
}

/// Vendor push. Always acknowledged so the vendor never retries delivery,
/// whatever the content type or shape of the body.
pub async fn image_callback(State(state): State<AppState>, body: Bytes) -> Json<CallbackAck> {
    let payload: CallbackPayload = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!("Callback payload not understood: {}", e);
        CallbackPayload::default()
    });

    match payload.into_task() {
        Some(task) => {
            info!(task_id = %task.task_id, status = ?task.status, "Image callback received");
            if let Err(e) = state.tasks.upsert(task).await {
                error!("Failed to store callback result: {}", e);
            }
        }
        None => warn!("Image callback without taskId ignored"),
    }

    Json(CallbackAck {
        success: true,
        message: "Callback received successfully".to_string(),
    })
}

/// One pass over the vendor's query routes, caching whatever is final.
async fn poll_once(state: &AppState, task_id: &str) -> PollResponse {
    let outcome = match state.images.as_ref() {
        Some(images) => images.poll(task_id).await.unwrap_or_else(|e| {
            warn!("Polling task {} failed: {}", task_id, e);
            PollOutcome::Unreachable
        }),
        None => PollOutcome::Unreachable,
    };

    let mut response = PollResponse {
        success: false,
        task_id: task_id.to_string(),
        image_url: None,
        status: "processing".to_string(),
        source: None,
        message: None,
    };

    match outcome {
        PollOutcome::Ready(url) => {
            let task = GenerationTask::completed(task_id, url.clone())
                .with_source("4oimageapi.io-polling");
            if let Err(e) = state.tasks.upsert(task).await {
                error!("Failed to cache polled result: {}", e);
            }
            response.success = true;
            response.image_url = Some(url);
            response.status = "completed".to_string();
            response.source = Some("polling".to_string());
        }
        PollOutcome::Failed => {
            let mut task = GenerationTask::processing(task_id).with_source("4oimageapi.io-polling");
            task.status = TaskStatus::Failed;
            if let Err(e) = state.tasks.upsert(task).await {
                error!("Failed to cache failed task: {}", e);
            }
            response.status = "failed".to_string();
            response.message = Some("Image generation failed".to_string());
        }
        PollOutcome::Pending(status) => {
            response.status = status;
            response.message = Some("Image still processing".to_string());
        }
        PollOutcome::Unreachable => {
            response.message =
                Some("Unable to query task status - all endpoints failed".to_string());
        }
    }

    response
}

pub async fn poll_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<PollResponse> {
    info!(task_id = %task_id, "Polling image task");
    Json(poll_once(&state, &task_id).await)
}

/// Cache first, then one poll. Never an error status, so clients can re-poll.
pub async fn task_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<TaskResultResponse> {
    let cached = state.tasks.get(&task_id).await.unwrap_or_else(|e| {
        warn!("Task cache lookup failed for {}: {}", task_id, e);
        None
    });

    if let Some(task) = cached.as_ref().filter(|t| t.status != TaskStatus::Processing) {
        info!(task_id = %task_id, "Task result served from cache");
        return Json(TaskResultResponse {
            success: true,
            task_id,
            result: Some(task.clone()),
            message: None,
        });
    }

    let polled = poll_once(&state, &task_id).await;
    if let (true, Some(url)) = (polled.success, polled.image_url) {
        return Json(TaskResultResponse {
            success: true,
            task_id: task_id.clone(),
            result: Some(GenerationTask::completed(&task_id, url).with_source("active-polling")),
            message: None,
        });
    }

    Json(TaskResultResponse {
        success: false,
        task_id,
        result: cached,
        message: Some("Task result not yet available".to_string()),
    })
}

/// Local stand-in for a vendor callback; not part of the production surface.
pub async fn test_callback(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> std::result::Result<Json<TestCallbackResponse>, ApiError> {
    let image_url = format!(
        "https://picsum.photos/800/600?random={}",
        Utc::now().timestamp_millis()
    );
    let task = GenerationTask::completed(&task_id, image_url).with_source("test-callback");

    state.tasks.upsert(task.clone()).await.map_err(|e| {
        error!("Mock callback failed: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Mock callback test failed")
    })?;

    info!(task_id = %task_id, "Simulated image callback stored");
    Ok(Json(TestCallbackResponse {
        success: true,
        message: "Mock callback processed successfully".to_string(),
        data: task,
    }))
}

/// Submits a fixed job and blocks on the poll loop; for checking the vendor by hand.
pub async fn debug_image(
    State(state): State<AppState>,
) -> std::result::Result<Json<DebugImageResponse>, ApiError> {
    let images = state.images.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "4oimageapi.io API key not configured",
        )
    })?;

    let task_id = images.submit(DEBUG_PROMPT, None).await.map_err(|e| {
        error!("Debug task submission failed: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let poll = state.settings.poll;
    info!(
        task_id = %task_id,
        attempts = poll.attempts,
        "Debug task created, waiting for result"
    );
    let outcome = wait_for_image(&**images, &task_id, poll.attempts, poll.interval).await;

    let (status, image_url) = match outcome {
        PollOutcome::Ready(url) => {
            let task = GenerationTask::completed(&task_id, url.clone()).with_source("debug");
            if let Err(e) = state.tasks.upsert(task).await {
                error!("Failed to cache debug result: {}", e);
            }
            (TaskStatus::Completed, Some(url))
        }
        PollOutcome::Failed => (TaskStatus::Failed, None),
        PollOutcome::Pending(_) | PollOutcome::Unreachable => (TaskStatus::Processing, None),
    };

    Ok(Json(DebugImageResponse {
        success: image_url.is_some(),
        task_id,
        image_url,
        status,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let dream_analysis = if state.chat.is_some() {
        "available (DeepSeek API)"
    } else {
        "unavailable (DeepSeek API key required)"
    };
    let image_generation = if state.images.is_some() {
        "available (4oimageapi.io GPT-4o)"
    } else {
        "limited (4oimageapi.io API key required)"
    };
    let stock_photos = if state.photos.is_some() {
        "available (Unsplash)"
    } else {
        "disabled (Unsplash access key not set)"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Dream interpretation service is running".to_string(),
        features: HealthFeatures {
            dream_analysis: dream_analysis.to_string(),
            image_generation: image_generation.to_string(),
            stock_photos: stock_photos.to_string(),
        },
    })
}

pub async fn translations(
    Path(language): Path<String>,
) -> Json<BTreeMap<&'static str, &'static str>> {
    Json(i18n::catalog(Language::from_code(&language)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryResponse {
    pub fallback_image: &'static str,
    pub items: Vec<GalleryItem>,
}

pub async fn gallery() -> Json<GalleryResponse> {
    let gallery = DreamGallery::with_samples();
    Json(GalleryResponse {
        fallback_image: gallery::FALLBACK_IMAGE,
        items: gallery.items().cloned().collect(),
    })
}
