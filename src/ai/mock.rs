use super::{ChatService, PollOutcome, StockPhotoService, VendorImageClient};
use crate::models::Language;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Canned vendor failure, rebuilt on every call since `Error` is not `Clone`.
#[derive(Debug, Clone)]
struct Failure {
    status: Option<u16>,
    message: String,
}

impl Failure {
    fn to_error(&self, provider: &'static str) -> Error {
        Error::Vendor {
            provider,
            status: self.status,
            message: self.message.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Option<Failure>,
    call_count: Arc<Mutex<usize>>,
    last_language: Arc<Mutex<Option<Language>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Every call fails as if the vendor answered with `status`.
    pub fn with_vendor_status(mut self, status: u16) -> Self {
        self.failure = Some(Failure {
            status: Some(status),
            message: format!("mock vendor status {}", status),
        });
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_language(&self) -> Option<Language> {
        *self.last_language.lock().unwrap()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn analyze_dream(&self, dream: &str, language: Language) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        *self.last_language.lock().unwrap() = Some(language);

        if let Some(failure) = &self.failure {
            return Err(failure.to_error("DeepSeek"));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("An interpretation of: {}", dream))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockImageClient {
    task_id: String,
    submit_failure: Option<Failure>,
    poll_outcomes: Arc<Mutex<Vec<PollOutcome>>>,
    submit_count: Arc<Mutex<usize>>,
    poll_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
    last_callback: Arc<Mutex<Option<String>>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            task_id: "mock-task-0001".to_string(),
            submit_failure: None,
            poll_outcomes: Arc::new(Mutex::new(Vec::new())),
            submit_count: Arc::new(Mutex::new(0)),
            poll_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            last_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_task_id(mut self, task_id: String) -> Self {
        self.task_id = task_id;
        self
    }

    /// Submissions fail as a malformed or rejected vendor answer would.
    pub fn with_submit_failure(mut self, message: String) -> Self {
        self.submit_failure = Some(Failure {
            status: None,
            message,
        });
        self
    }

    /// Outcomes are replayed in order; the last one repeats.
    pub fn with_poll_outcome(self, outcome: PollOutcome) -> Self {
        self.poll_outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn get_submit_count(&self) -> usize {
        *self.submit_count.lock().unwrap()
    }

    pub fn get_poll_count(&self) -> usize {
        *self.poll_count.lock().unwrap()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_callback(&self) -> Option<String> {
        self.last_callback.lock().unwrap().clone()
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VendorImageClient for MockImageClient {
    async fn submit(&self, prompt: &str, callback_url: Option<&str>) -> Result<String> {
        *self.submit_count.lock().unwrap() += 1;
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_callback.lock().unwrap() = callback_url.map(str::to_string);

        match &self.submit_failure {
            Some(failure) => Err(failure.to_error("4oimageapi.io")),
            None => Ok(self.task_id.clone()),
        }
    }

    async fn poll(&self, _task_id: &str) -> Result<PollOutcome> {
        let mut count = self.poll_count.lock().unwrap();
        *count += 1;

        let outcomes = self.poll_outcomes.lock().unwrap();
        let index = (*count - 1).min(outcomes.len().saturating_sub(1));
        Ok(outcomes
            .get(index)
            .cloned()
            .unwrap_or(PollOutcome::Unreachable))
    }
}

#[derive(Clone, Default)]
pub struct MockStockPhotoClient {
    url: Option<String>,
    fail: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockStockPhotoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn get_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockPhotoService for MockStockPhotoClient {
    async fn search(&self, query: &str) -> Result<Option<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(Error::vendor("Unsplash", "mock search failure"));
        }
        Ok(self.url.clone())
    }
}
