//! OpenAI-compatible HTTP backends built on `reqwest`.
//!
//! Both clients speak the Together-style REST surface: `/chat/completions`
//! for text and `/images/generations` for images. `from_env` constructors
//! load configuration through `dotenvy` so a local `.env` file works the
//! same as real environment variables.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{BackendError, ChatBackend, GenerationParams, ImageBackend};
use crate::message::Message;

/// Default API root when `TOGETHER_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";

const DEFAULT_CHAT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";

fn env_base_url() -> String {
    std::env::var("TOGETHER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn env_api_key() -> Result<String, BackendError> {
    std::env::var("TOGETHER_API_KEY").map_err(|_| BackendError::MissingEnv("TOGETHER_API_KEY"))
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpChatBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a client from `TOGETHER_API_KEY`, `TOGETHER_BASE_URL`, and
    /// `IMAGINEER_CHAT_MODEL`.
    pub fn from_env() -> Result<Self, BackendError> {
        dotenvy::dotenv().ok();
        let model =
            std::env::var("IMAGINEER_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into());
        Ok(Self::new(env_base_url(), env_api_key()?, model))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, messages: &[Message]) -> Result<String, BackendError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let response: Value = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| BackendError::Provider {
                provider: "chat",
                message: format!("response missing choices[0].message.content: {response}"),
            })
    }
}

/// Image-generation client for a Together-style endpoint.
///
/// Returns the provider response verbatim as JSON; shape tolerance lives in
/// the generate step, not here.
pub struct HttpImageBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpImageBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from `TOGETHER_API_KEY` and `TOGETHER_BASE_URL`.
    pub fn from_env() -> Result<Self, BackendError> {
        dotenvy::dotenv().ok();
        Ok(Self::new(env_base_url(), env_api_key()?))
    }
}

#[async_trait]
impl ImageBackend for HttpImageBackend {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Value, BackendError> {
        let body = json!({
            "model": params.model,
            "prompt": prompt,
            "steps": params.steps,
            "n": params.count,
        });

        let response: Value = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
