use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::config::Config;
use crate::scoring::engine::FitScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable fit scorer. Default: ScoreEngine; FallbackFitScorer when no
    /// embedding client can be built.
    pub fit_scorer: Arc<dyn FitScorer>,
    pub applications: ApplicationStore,
}
