use crate::domain::ports::ChatService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 250;
const TEMPERATURE: f64 = 0.7;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

pub struct OpenAiService {
    client: Client,
    api_key: String,
}

impl OpenAiService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    async fn send_request_with_retry(&self, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self
                .client
                .post(CHAT_COMPLETIONS_URL)
                .bearer_auth(&self.api_key)
                .header("Content-Type", "application/json")
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse OpenAI response JSON: {:?}", e);
                            AppError::Internal
                        })?;
                        return extract_content(&body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("OpenAI API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::InternalWithMsg(format!(
                                "AI provider error: {} - {}",
                                status, text
                            )));
                        }
                        warn!("OpenAI API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("OpenAI API terminal error {}: {}", status, text);
                        return Err(AppError::InternalWithMsg(format!(
                            "AI request rejected: {} - {}",
                            status, text
                        )));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("OpenAI network error after {} retries: {:?}", retries, e);
                        return Err(AppError::InternalWithMsg(format!("AI network error: {}", e)));
                    }
                    warn!("OpenAI network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

fn extract_content(body: &Value) -> Result<String, AppError> {
    if let Some(content) = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|first| first.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|text| text.as_str())
    {
        return Ok(content.trim().to_string());
    }

    error!("Invalid or unexpected response structure from OpenAI: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".to_string()))
}

#[async_trait]
impl ChatService for OpenAiService {
    #[instrument(skip(self, system_prompt, user_message), fields(prompt_len = user_message.len()))]
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, AppError> {
        let payload = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message}
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE
        });

        info!("Sending chat completion request to OpenAI...");
        let result = self.send_request_with_retry(&payload).await?;
        info!("Successfully received chat completion.");
        Ok(result)
    }
}
