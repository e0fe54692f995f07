//! Process-scoped embedding provider handle.
//!
//! Lifecycle: `Uninitialized → Initializing → Ready(backend) | Failed`.
//! Initialization is single-flight: concurrent callers await the same
//! attempt through a `tokio::sync::OnceCell`. Each backend attempt is bounded
//! by `init_timeout`; a timeout counts as that backend failing.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::{Backend, EmbeddingError, EmbeddingProvider, ProviderLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProviderStatus {
    Uninitialized,
    Initializing,
    Ready { backend: Backend },
    Failed,
}

impl ProviderStatus {
    fn to_u8(self) -> u8 {
        match self {
            ProviderStatus::Uninitialized => 0,
            ProviderStatus::Initializing => 1,
            ProviderStatus::Ready {
                backend: Backend::Accelerated,
            } => 2,
            ProviderStatus::Ready {
                backend: Backend::Cpu,
            } => 3,
            ProviderStatus::Failed => 4,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ProviderStatus::Initializing,
            2 => ProviderStatus::Ready {
                backend: Backend::Accelerated,
            },
            3 => ProviderStatus::Ready {
                backend: Backend::Cpu,
            },
            4 => ProviderStatus::Failed,
            _ => ProviderStatus::Uninitialized,
        }
    }
}

pub struct ProviderHandle {
    loader: Arc<dyn ProviderLoader>,
    cell: OnceCell<Arc<dyn EmbeddingProvider>>,
    status: AtomicU8,
    attempts: AtomicU32,
    init_timeout: Duration,
    retry_failed_init: bool,
}

impl ProviderHandle {
    pub fn new(
        loader: Arc<dyn ProviderLoader>,
        init_timeout: Duration,
        retry_failed_init: bool,
    ) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
            status: AtomicU8::new(ProviderStatus::Uninitialized.to_u8()),
            attempts: AtomicU32::new(0),
            init_timeout,
            retry_failed_init,
        }
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Number of initialization attempts made so far (each covers all backends).
    #[cfg(test)]
    pub fn init_attempts(&self) -> u32 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Returns the ready provider, initializing it on first use.
    pub async fn acquire(&self) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        if let Some(provider) = self.cell.get() {
            return Ok(provider.clone());
        }
        self.cell.get_or_try_init(|| self.initialize()).await.cloned()
    }

    async fn initialize(&self) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        if !self.retry_failed_init && self.status() == ProviderStatus::Failed {
            return Err(EmbeddingError::Unavailable);
        }

        let guard = InitGuard::begin(self);
        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
        info!(attempt, "Initializing embedding provider...");

        for backend in Backend::ORDER {
            let error = match tokio::time::timeout(self.init_timeout, self.loader.load(backend)).await
            {
                Ok(Ok(provider)) => {
                    guard.finish(ProviderStatus::Ready { backend });
                    info!(%backend, "Embedding provider ready");
                    return Ok(provider);
                }
                Ok(Err(e)) => e,
                Err(_) => EmbeddingError::InitTimeout {
                    backend,
                    secs: self.init_timeout.as_secs(),
                },
            };
            warn!(%backend, error = %error, "Embedding backend failed to initialize");
        }

        guard.finish(ProviderStatus::Failed);
        warn!(
            retry = self.retry_failed_init,
            "No embedding backend available; scoring will use the fallback analysis"
        );
        Err(EmbeddingError::Unavailable)
    }

    fn set_status(&self, status: ProviderStatus) {
        self.status.store(status.to_u8(), Ordering::Release);
    }
}

/// Holds the handle in `Initializing` for one attempt. If the attempt is
/// dropped before it finishes (the caller was cancelled), the prior status
/// is restored so the next caller starts a fresh attempt.
struct InitGuard<'a> {
    handle: &'a ProviderHandle,
    prior: ProviderStatus,
    finished: bool,
}

impl<'a> InitGuard<'a> {
    fn begin(handle: &'a ProviderHandle) -> Self {
        let prior = handle.status();
        handle.set_status(ProviderStatus::Initializing);
        Self {
            handle,
            prior,
            finished: false,
        }
    }

    fn finish(mut self, status: ProviderStatus) {
        self.handle.set_status(status);
        self.finished = true;
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(status = ?self.prior, "Embedding provider initialization cancelled");
            self.handle.set_status(self.prior);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable providers and loaders shared by the embedding and scoring tests.

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::embedding::{
        Backend, EmbeddingError, EmbeddingProvider, EmbeddingVector, Pooling, ProviderLoader,
    };

    /// Returns a fixed vector per call, keyed on whether the text contains `marker`.
    pub struct FixedProvider {
        pub backend: Backend,
        pub marker: String,
        pub marked: EmbeddingVector,
        pub unmarked: EmbeddingVector,
    }

    impl FixedProvider {
        /// Every text embeds to the same vector → similarity 1.0.
        pub fn uniform(vector: EmbeddingVector) -> Self {
            Self {
                backend: Backend::Cpu,
                marker: String::new(),
                marked: vector.clone(),
                unmarked: vector,
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        fn backend(&self) -> Backend {
            self.backend
        }

        async fn embed(
            &self,
            text: &str,
            _pooling: Pooling,
            _normalize: bool,
        ) -> Result<EmbeddingVector, EmbeddingError> {
            if text.contains(&self.marker) {
                Ok(self.marked.clone())
            } else {
                Ok(self.unmarked.clone())
            }
        }
    }

    /// Loads successfully but every embed call fails.
    pub struct BrokenProvider;

    #[async_trait]
    impl EmbeddingProvider for BrokenProvider {
        fn backend(&self) -> Backend {
            Backend::Cpu
        }

        async fn embed(
            &self,
            _text: &str,
            _pooling: Pooling,
            _normalize: bool,
        ) -> Result<EmbeddingVector, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 500,
                message: "inference crashed".to_string(),
            })
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    pub enum Outcome {
        Succeed,
        Fail,
        Hang,
    }

    /// Loader whose per-backend outcome is scripted; counts every load call.
    pub struct ScriptedLoader {
        pub accelerated: Outcome,
        pub cpu: Outcome,
        pub delay: Duration,
        pub provider: Arc<dyn EmbeddingProvider>,
        pub loads: AtomicU32,
    }

    impl ScriptedLoader {
        pub fn new(accelerated: Outcome, cpu: Outcome, provider: Arc<dyn EmbeddingProvider>) -> Self {
            Self {
                accelerated,
                cpu,
                delay: Duration::ZERO,
                provider,
                loads: AtomicU32::new(0),
            }
        }

        pub fn failing() -> Self {
            Self::new(
                Outcome::Fail,
                Outcome::Fail,
                Arc::new(FixedProvider::uniform(vec![1.0])),
            )
        }

        pub fn loads(&self) -> u32 {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderLoader for ScriptedLoader {
        async fn load(
            &self,
            backend: Backend,
        ) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let outcome = match backend {
                Backend::Accelerated => self.accelerated,
                Backend::Cpu => self.cpu,
            };
            match outcome {
                Outcome::Succeed => Ok(self.provider.clone()),
                Outcome::Fail => Err(EmbeddingError::NotConfigured(backend)),
                Outcome::Hang => std::future::pending().await,
            }
        }
    }
}
