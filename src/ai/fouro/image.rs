use super::client::{FourOHttpClient, PROVIDER};
use super::types::{Envelope, GenerateRequest};
use crate::ai::{PollOutcome, VendorImageClient};
use crate::models::TaskStatus;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

const GENERATE_PATH: &str = "/api/v1/gpt4o-image/generate";
const IMAGE_SIZE: &str = "1:1";

/// Query routes tried in order. The vendor does not document which one is live.
#[derive(Debug, Clone, Copy)]
enum QueryRoute {
    GetStatus,
    GetResult,
    GetTask,
    PostQuery,
}

const QUERY_ROUTES: [QueryRoute; 4] = [
    QueryRoute::GetStatus,
    QueryRoute::GetResult,
    QueryRoute::GetTask,
    QueryRoute::PostQuery,
];

pub struct FourOImageClient {
    http: FourOHttpClient,
    query_timeout: Duration,
}

impl FourOImageClient {
    pub fn new_with_client(api_key: String, client: Client, query_timeout: Duration) -> Self {
        Self {
            http: FourOHttpClient::new_with_client(api_key, client),
            query_timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    async fn query(&self, route: QueryRoute, task_id: &str) -> Result<Envelope> {
        let timeout = Some(self.query_timeout);
        match route {
            QueryRoute::GetStatus => {
                self.http
                    .get(&format!("/api/v1/gpt4o-image/status/{}", task_id), timeout)
                    .await
            }
            QueryRoute::GetResult => {
                self.http
                    .get(&format!("/api/v1/gpt4o-image/result/{}", task_id), timeout)
                    .await
            }
            QueryRoute::GetTask => {
                self.http
                    .get(&format!("/api/v1/gpt4o-image/{}", task_id), timeout)
                    .await
            }
            QueryRoute::PostQuery => {
                self.http
                    .post(
                        "/api/v1/gpt4o-image/query",
                        &serde_json::json!({ "taskId": task_id }),
                        timeout,
                    )
                    .await
            }
        }
    }
}

#[async_trait]
impl VendorImageClient for FourOImageClient {
    async fn submit(&self, prompt: &str, callback_url: Option<&str>) -> Result<String> {
        let request = GenerateRequest {
            files_url: Vec::new(),
            prompt: prompt.to_string(),
            size: IMAGE_SIZE.to_string(),
            call_back_url: callback_url.unwrap_or_default().to_string(),
        };

        let envelope = self.http.post(GENERATE_PATH, &request, None).await?;

        if !envelope.is_ok() {
            return Err(Error::vendor(
                PROVIDER,
                format!(
                    "Task rejected (code {:?}): {}",
                    envelope.code,
                    envelope.msg.as_deref().unwrap_or("no message")
                ),
            ));
        }

        let task_id = envelope
            .task_id()
            .ok_or_else(|| Error::vendor(PROVIDER, "Accepted response without taskId"))?;
        info!("{} task created: {}", PROVIDER, task_id);
        Ok(task_id)
    }

    async fn poll(&self, task_id: &str) -> Result<PollOutcome> {
        for route in QUERY_ROUTES {
            let envelope = match self.query(route, task_id).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    debug!("Query route {:?} failed for {}: {}", route, task_id, e);
                    continue;
                }
            };

            if !envelope.is_ok() {
                debug!("Query route {:?} returned code {:?}", route, envelope.code);
                continue;
            }

            if let Some(url) = envelope.image_url() {
                info!("Image ready for task {} via {:?}", task_id, route);
                return Ok(PollOutcome::Ready(url));
            }

            let status = envelope.status();
            return Ok(match TaskStatus::from_vendor(status.as_deref(), false) {
                TaskStatus::Failed => PollOutcome::Failed,
                _ => PollOutcome::Pending(status.unwrap_or_else(|| "processing".to_string())),
            });
        }

        Ok(PollOutcome::Unreachable)
    }
}
