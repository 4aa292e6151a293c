//! Lazy invocable model handles.
//!
//! A [`ModelHandle`] carries everything needed to call a model — provider
//! identity, upstream id, defaults, endpoint, credentials — but performs no
//! I/O until [`chat`](ModelHandle::chat) is awaited. Upstream rejections
//! are mapped into the error taxonomy and propagated as-is; retries, if
//! any, belong to the HTTP client layer beneath, not here.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{MuninError, Result};
use crate::types::{ChatResponse, Message, ModelDefaults, ProviderId};

/// A ready-to-call chat interface for one resolved model.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    provider: ProviderId,
    model: String,
    defaults: ModelDefaults,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// OpenAI-compatible completion response envelope (the subset we read).
#[derive(Deserialize)]
struct CompletionEnvelope {
    model: Option<String>,
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl ModelHandle {
    pub(crate) fn new(
        provider: ProviderId,
        model: impl Into<String>,
        defaults: ModelDefaults,
        base_url: impl Into<String>,
        api_key: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            defaults,
            base_url: base_url.into(),
            api_key,
            client,
        }
    }

    /// Provider this handle routes to.
    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// Upstream model id this handle invokes.
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Catalog defaults baked into this handle.
    pub fn defaults(&self) -> &ModelDefaults {
        &self.defaults
    }

    /// Non-streaming chat completion.
    ///
    /// Single OpenAI-compatible POST; catalog defaults fill request slots
    /// the caller left unset. Upstream errors map onto the taxonomy
    /// (401 → `AuthenticationFailed`, 429 → `RateLimited`,
    /// 404 → `ModelNotFound`) and are not retried here.
    #[instrument(skip(self, messages), fields(provider = %self.provider, model = %self.model))]
    pub async fn chat(&self, messages: &[Message]) -> Result<ChatResponse> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temperature) = self.defaults.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = self.defaults.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(max_tokens) = self.defaults.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(seed) = self.defaults.seed {
            body["seed"] = json!(seed);
        }

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MuninError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => MuninError::AuthenticationFailed,
                429 => MuninError::RateLimited,
                404 => MuninError::ModelNotFound(self.model.clone()),
                code => MuninError::Api { status: code, message },
            });
        }

        let envelope: CompletionEnvelope = response
            .json()
            .await
            .map_err(|e| MuninError::Http(e.to_string()))?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| MuninError::InvalidInput("empty completion response".to_string()))?;

        Ok(ChatResponse {
            content,
            model: envelope.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}
