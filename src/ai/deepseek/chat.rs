use super::client::DeepSeekHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::ChatService;
use crate::models::Language;
use crate::prompts::AnalysisPrompt;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

pub struct DeepSeekChatClient {
    http: DeepSeekHttpClient,
    model: String,
}

impl DeepSeekChatClient {
    pub fn new_with_client(api_key: String, model: String, client: Client) -> Self {
        Self {
            http: DeepSeekHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for DeepSeekChatClient {
    async fn analyze_dream(&self, dream: &str, language: Language) -> Result<String> {
        let prompt = AnalysisPrompt::for_language(language);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system),
                ChatMessage::user(prompt.user_message(dream)),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(language = language.code(), "Sending dream analysis to DeepSeek");
        let response = self.http.chat_completion(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::vendor("DeepSeek", "No response from chat API"))
    }
}
