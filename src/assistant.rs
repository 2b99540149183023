//! Client for the optional text-completion assistant (Anthropic messages API).

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    SyncError,
    catalog::Assistant,
    config::AssistantSettings,
    types::{AssistantMessage, AssistantRequest, AssistantResponse},
};

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(settings: &AssistantSettings) -> Self {
        Self {
            http: Client::new(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }
}

#[async_trait]
impl Assistant for AnthropicClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, SyncError> {
        let request = AssistantRequest {
            model: self.model.clone(),
            max_tokens,
            temperature,
            system: system_prompt.to_string(),
            messages: vec![AssistantMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| SyncError::Assistant(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Assistant(format!(
                "Request failed with status {}: {}",
                status, body
            )));
        }

        let response: AssistantResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Assistant(e.to_string()))?;

        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| SyncError::Assistant("Response contained no text".to_string()))
    }
}
