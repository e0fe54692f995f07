//! Embedding Provider: the single point of entry for text embeddings in JobFunnel.
//!
//! The scoring engine only sees the `EmbeddingProvider` trait. Concrete
//! backends are produced by a `ProviderLoader` and held by a process-scoped
//! `ProviderHandle` that initializes them lazily, at most once at a time.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod handle;
pub mod http;

pub use handle::{ProviderHandle, ProviderStatus};
pub use http::HttpProviderLoader;

/// Ordered sequence of reals representing one text. Owned by the caller for
/// the duration of a single similarity computation.
pub type EmbeddingVector = Vec<f32>;

/// How token embeddings are collapsed into a single text vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pooling {
    Mean,
    #[allow(dead_code)]
    Cls,
}

/// Hardware backend an embedding provider runs on, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Accelerated,
    Cpu,
}

impl Backend {
    /// Initialization order: accelerated hardware first, CPU as the last resort.
    pub const ORDER: [Backend; 2] = [Backend::Accelerated, Backend::Cpu];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Accelerated => f.write_str("accelerated"),
            Backend::Cpu => f.write_str("cpu"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("{0} backend is not configured")]
    NotConfigured(Backend),

    #[error("{backend} backend initialization timed out after {secs}s")]
    InitTimeout { backend: Backend, secs: u64 },

    #[error("no embedding backend could be initialized")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding server returned no vectors")]
    EmptyResponse,
}

/// A capability that turns text into an embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn backend(&self) -> Backend;

    async fn embed(
        &self,
        text: &str,
        pooling: Pooling,
        normalize: bool,
    ) -> Result<EmbeddingVector, EmbeddingError>;
}

/// Builds a ready-to-use provider for one backend. Loading may be slow
/// (model download, warm-up) and is bounded by the handle's timeout.
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    async fn load(&self, backend: Backend) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_order_prefers_accelerated() {
        assert_eq!(Backend::ORDER, [Backend::Accelerated, Backend::Cpu]);
    }

    #[test]
    fn test_pooling_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Pooling::Mean).unwrap(), r#""mean""#);
        assert_eq!(serde_json::to_string(&Backend::Cpu).unwrap(), r#""cpu""#);
    }

    #[test]
    fn test_not_configured_error_names_backend() {
        let err = EmbeddingError::NotConfigured(Backend::Accelerated);
        assert_eq!(err.to_string(), "accelerated backend is not configured");
    }
}
