//! 4oimageapi.io payloads.
//!
//! Only the submit call is documented. Query responses are read as loose JSON
//! because the field names vary between the guessed endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for a text-to-image job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub files_url: Vec<String>,
    pub prompt: String,
    pub size: String,
    pub call_back_url: String,
}

/// `{code, msg, data}` wrapper used by every vendor response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub code: Option<i64>,
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn is_ok(&self) -> bool {
        self.code == Some(200)
    }

    pub fn task_id(&self) -> Option<String> {
        self.data
            .get("taskId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Image URL under any of the field names the vendor has been seen to use.
    pub fn image_url(&self) -> Option<String> {
        let data = &self.data;
        [
            data.get("imageUrl"),
            data.get("image_url"),
            data.get("url"),
            data.get("images").and_then(|images| images.get(0)),
            data.get("result").and_then(|result| result.get("imageUrl")),
        ]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|url| !url.is_empty())
        .map(str::to_string)
    }

    pub fn status(&self) -> Option<String> {
        self.data
            .get("status")
            .or_else(|| self.data.get("state"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
