use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::summary::{PropertyBrief, SummaryError, Summarizer};

const MAX_TOKENS: u32 = 250;
const TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage
}

/// Summarizer backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String
}

impl OpenAiSummarizer {
    pub fn new(
        url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration
    ) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(OpenAiSummarizer {
            client,
            url: url.to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned()
        })
    }

    async fn complete(
        client: reqwest::Client,
        url: String,
        api_key: String,
        model: String,
        prompt: String
    ) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: &model,
            messages: vec![ChatMessage { role: "user".to_owned(), content: prompt }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE
        };

        let response: ChatResponse = client
            .post(&url)
            .bearer_auth(&api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SummaryError::InvalidResponse("no completion returned".to_owned()))
    }
}

impl Summarizer for OpenAiSummarizer {
    fn summarize(&self, brief: PropertyBrief) -> BoxFuture<'static, Result<String, SummaryError>> {
        Box::pin(OpenAiSummarizer::complete(
            self.client.clone(),
            self.url.clone(),
            self.api_key.clone(),
            self.model.clone(),
            brief.prompt()
        ))
    }

    fn source(&self) -> &'static str {
        "ai"
    }
}
