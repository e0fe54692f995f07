mod applications;
mod config;
mod embedding;
mod errors;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::config::Config;
use crate::embedding::{HttpProviderLoader, ProviderHandle};
use crate::routes::build_router;
use crate::scoring::engine::{FallbackFitScorer, FitScorer, ScoreEngine};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFunnel API v{}", env!("CARGO_PKG_VERSION"));

    let fit_scorer = build_fit_scorer(&config);

    let state = AppState {
        config: config.clone(),
        fit_scorer,
        applications: ApplicationStore::seeded(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Embedding-backed scorer when an HTTP client can be built; mock-only otherwise.
/// The provider itself loads lazily on the first scoring call.
fn build_fit_scorer(config: &Config) -> Arc<dyn FitScorer> {
    let rng = match config.scoring_seed {
        Some(seed) => {
            info!(seed, "Score jitter seeded");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let embedding = &config.embedding;
    if embedding.accelerated_url.is_none() && embedding.cpu_url.is_none() {
        warn!("No embedding backend URL configured; fit scores will use the fallback analysis");
    }

    match HttpProviderLoader::new(embedding) {
        Ok(loader) => {
            info!(
                model = %embedding.model,
                accelerated = embedding.accelerated_url.as_deref().unwrap_or("-"),
                cpu = embedding.cpu_url.as_deref().unwrap_or("-"),
                "Embedding provider configured (lazy)"
            );
            let handle = ProviderHandle::new(
                Arc::new(loader),
                embedding.init_timeout,
                embedding.retry_failed_init,
            );
            Arc::new(ScoreEngine::new(handle, rng))
        }
        Err(e) => {
            warn!(error = %e, "Failed to build embedding client; using fallback scorer");
            Arc::new(FallbackFitScorer::new(rng))
        }
    }
}
