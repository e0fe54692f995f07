//! HTTP embedding backend: talks to a text-embedding server (one URL per backend).
//!
//! Wire format: `POST {base_url}/embed` with
//! `{"inputs": "...", "pooling": "mean", "normalize": true, "model": "..."}`,
//! answered by a JSON array of vectors (`[[f32, ...]]`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{Backend, EmbeddingError, EmbeddingProvider, EmbeddingVector, Pooling, ProviderLoader};
use crate::config::EmbeddingConfig;

const MAX_RETRIES: u32 = 3;
const WARMUP_TEXT: &str = "warmup";

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
    pooling: Pooling,
    normalize: bool,
    model: &'a str,
}

/// One embedding server reachable over HTTP.
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    backend: Backend,
}

impl HttpEmbeddingProvider {
    pub fn new(client: Client, base_url: &str, model: String, backend: Backend) -> Self {
        Self {
            client,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
            model,
            backend,
        }
    }

    /// Sends one embed request. Retries on 429 (rate limit) and 5xx errors
    /// with exponential backoff.
    async fn request(
        &self,
        text: &str,
        pooling: Pooling,
        normalize: bool,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbedRequest {
            inputs: text,
            pooling,
            normalize,
            model: &self.model,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    backend = %self.backend,
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.json::<Vec<Vec<f32>>>().await?);
        }

        Err(last_error.unwrap_or(EmbeddingError::Unavailable))
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn embed(
        &self,
        text: &str,
        pooling: Pooling,
        normalize: bool,
    ) -> Result<EmbeddingVector, EmbeddingError> {
        let mut vector = self
            .request(text, pooling, normalize)
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::EmptyResponse)?;

        // Servers that ignore the flag still hand back a unit vector.
        if normalize {
            l2_normalize(&mut vector);
        }

        debug!(backend = %self.backend, dim = vector.len(), "Embedding generated");
        Ok(vector)
    }
}

/// Builds `HttpEmbeddingProvider`s from configuration. A backend without a
/// URL fails to load, which pushes the handle on to the next backend.
pub struct HttpProviderLoader {
    client: Client,
    accelerated_url: Option<String>,
    cpu_url: Option<String>,
    model: String,
}

impl HttpProviderLoader {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            accelerated_url: config.accelerated_url.clone(),
            cpu_url: config.cpu_url.clone(),
            model: config.model.clone(),
        })
    }

    fn url_for(&self, backend: Backend) -> Option<&str> {
        match backend {
            Backend::Accelerated => self.accelerated_url.as_deref(),
            Backend::Cpu => self.cpu_url.as_deref(),
        }
    }
}

#[async_trait]
impl ProviderLoader for HttpProviderLoader {
    async fn load(&self, backend: Backend) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        let url = self
            .url_for(backend)
            .ok_or(EmbeddingError::NotConfigured(backend))?;

        let provider =
            HttpEmbeddingProvider::new(self.client.clone(), url, self.model.clone(), backend);

        // Warm-up call: proves the server is reachable and the model is loaded.
        let warmup = provider.embed(WARMUP_TEXT, Pooling::Mean, true).await?;
        info!(%backend, model = %self.model, dim = warmup.len(), "Embedding backend loaded");

        Ok(Arc::new(provider))
    }
}

/// Scales `v` to unit length in place. Zero vectors are left untouched.
fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
