use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {model} failed: {source}")]
    Http {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{model} returned status {status}")]
    Status { model: String, status: u16 },
    #[error("{model} returned no completion text")]
    Empty { model: String },
    #[error("all {0} model candidates failed")]
    Exhausted(usize),
}

/// Text-completion backend for meal suggestions. Implementations are
/// untrusted: whatever they return goes through defensive parsing and the
/// budget validator before it reaches a caller.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

/// OpenAI-compatible chat backend with an ordered list of model candidates.
/// Candidates are tried in sequence; the first success wins. Each request is
/// bounded by the client timeout.
pub struct ChainBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    models: Vec<String>,
}

impl ChainBackend {
    pub fn from_config(cfg: &AiConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !cfg.models.is_empty(),
            "at least one AI model candidate is required"
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            models: cfg.models.clone(),
        })
    }

    async fn try_model(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        let body = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.4,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Http {
                model: model.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                model: model.to_string(),
                status: status.as_u16(),
            });
        }

        let value: serde_json::Value = resp.json().await.map_err(|e| BackendError::Http {
            model: model.to_string(),
            source: e,
        })?;

        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| BackendError::Empty {
                model: model.to_string(),
            })
    }
}

#[async_trait]
impl SuggestionBackend for ChainBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        for model in &self.models {
            match self.try_model(model, prompt).await {
                Ok(text) => {
                    debug!(%model, "completion served");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(%model, error = %e, "model candidate failed, trying next");
                }
            }
        }
        Err(BackendError::Exhausted(self.models.len()))
    }
}

/// Scripted backend for tests and the fake app state. Counts calls so tests
/// can assert the zero-budget short-circuit never touches the backend.
pub struct FakeBackend {
    response: Option<String>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn replying(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionBackend for FakeBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(BackendError::Exhausted(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_requires_at_least_one_model() {
        let cfg = AiConfig {
            base_url: "http://localhost".into(),
            api_key: String::new(),
            models: vec![],
            timeout_secs: 5,
        };
        assert!(ChainBackend::from_config(&cfg).is_err());
    }

    #[tokio::test]
    async fn fake_backend_counts_calls() {
        let backend = FakeBackend::replying("hello");
        assert_eq!(backend.calls(), 0);
        let out = backend.complete("prompt").await.unwrap();
        assert_eq!(out, "hello");
        assert_eq!(backend.calls(), 1);

        let failing = FakeBackend::failing();
        assert!(failing.complete("prompt").await.is_err());
        assert_eq!(failing.calls(), 1);
    }
}
