//! Data models and structures
//!
//! Defines the request/response bodies exchanged with the browser and the
//! generation task record kept for the image vendor's asynchronous jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Locales the service can answer in. Anything unrecognized is English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Zh,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Zh, Language::Es];

    /// Case-insensitive, tolerant of region tags (`zh-CN`, `es_MX`).
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "zh" => Language::Zh,
            "es" => Language::Es,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Es => "es",
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Any JSON value is accepted; only strings are kept.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub dream: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

impl AnalysisRequest {
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .map(Language::from_code)
            .unwrap_or_default()
    }

    /// Dream text as sent, `None` when missing or blank.
    pub fn dream(&self) -> Option<&str> {
        non_empty(self.dream.as_deref())?;
        self.dream.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub dream: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

impl ImageRequest {
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .map(Language::from_code)
            .unwrap_or_default()
    }

    pub fn dream(&self) -> Option<&str> {
        non_empty(self.dream.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Maps the loose status words the vendor uses onto the three states.
    pub fn from_vendor(status: Option<&str>, has_image: bool) -> Self {
        match status.map(str::to_ascii_lowercase).as_deref() {
            Some("completed" | "success" | "finished") => TaskStatus::Completed,
            Some("failed" | "error") => TaskStatus::Failed,
            None if has_image => TaskStatus::Completed,
            _ => TaskStatus::Processing,
        }
    }
}

/// One asynchronous image job, keyed by the vendor-assigned task id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTask {
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: TaskStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GenerationTask {
    pub fn processing(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            image_url: None,
            status: TaskStatus::Processing,
            timestamp: Utc::now(),
            source: None,
        }
    }

    pub fn completed(task_id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            image_url: Some(image_url.into()),
            status: TaskStatus::Completed,
            timestamp: Utc::now(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Vendor-pushed completion notice. Every field is optional so that any
/// JSON object is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl CallbackPayload {
    pub fn into_task(self) -> Option<GenerationTask> {
        let task_id = self.task_id.filter(|id| !id.trim().is_empty())?;
        let status = TaskStatus::from_vendor(self.status.as_deref(), self.image_url.is_some());
        Some(GenerationTask {
            task_id,
            image_url: self.image_url,
            status,
            timestamp: Utc::now(),
            source: Some("callback".to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackAck {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub success: bool,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResultResponse {
    pub success: bool,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCallbackResponse {
    pub success: bool,
    pub message: String,
    pub data: GenerationTask,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugImageResponse {
    pub success: bool,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFeatures {
    pub dream_analysis: String,
    pub image_generation: String,
    pub stock_photos: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub features: HealthFeatures,
}
