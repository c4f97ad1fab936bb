use super::types::Envelope;
use crate::config::DEFAULT_FOURO_IMAGE_BASE_URL;
use crate::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

pub(crate) const PROVIDER: &str = "4oimageapi.io";

pub struct FourOHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl FourOHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_FOURO_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn post<Req: Serialize>(
        &self,
        path: &str,
        request: &Req,
        timeout: Option<Duration>,
    ) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        self.send(builder, timeout).await
    }

    pub async fn get(&self, path: &str, timeout: Option<Duration>) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.get(&url), timeout).await
    }

    async fn send(&self, builder: RequestBuilder, timeout: Option<Duration>) -> Result<Envelope> {
        let mut builder = builder
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(Error::Vendor {
                provider: PROVIDER,
                status: Some(status.as_u16()),
                message: format!("status {}: {}", status, error_text),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Unrecognized {} response: {}\nBody: {}", PROVIDER, e, body);
            Error::vendor(PROVIDER, format!("Failed to parse response: {}", e))
        })
    }
}
