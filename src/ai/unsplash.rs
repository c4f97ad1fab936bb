//! Unsplash photo search, the secondary tier of the image pipeline.

use super::StockPhotoService;
use crate::config::DEFAULT_UNSPLASH_BASE_URL;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
    timeout: Duration,
}

impl UnsplashClient {
    pub fn new_with_client(access_key: String, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            access_key,
            base_url: DEFAULT_UNSPLASH_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl StockPhotoService for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("query", query), ("orientation", "landscape"), ("per_page", "1")])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(Error::Vendor {
                provider: "Unsplash",
                status: Some(status.as_u16()),
                message: format!("status {}: {}", status, error_text),
            });
        }

        let search: SearchResponse = response.json().await?;
        Ok(search.results.into_iter().next().map(|photo| photo.urls.regular))
    }
}
