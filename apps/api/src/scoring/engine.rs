//! Score Engine: pluggable, trait-based scorer that measures a résumé against a job description.
//!
//! Default: `ScoreEngine` (embedding similarity + keyword analysis, mock fallback).
//! `FallbackFitScorer` serves the mock analysis only, for deployments with no
//! embedding backend at all.
//!
//! `AppState` holds an `Arc<dyn FitScorer>`, chosen at startup.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::embedding::{EmbeddingError, Pooling, ProviderHandle, ProviderStatus};
use crate::scoring::fallback::mock_analysis;
use crate::scoring::keywords::analyze_keywords;
use crate::scoring::models::{FitAnalysis, ScoreResult};
use crate::scoring::similarity::{cosine_similarity, similarity_to_percent};

/// Bounds of the uniform jitter added to the similarity percentage.
pub const JITTER: f64 = 10.0;
/// Primary-path scores are clamped into this band after jitter.
pub const PRIMARY_MIN: u8 = 65;
pub const PRIMARY_MAX: u8 = 95;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The fit scorer trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
///
/// `score` never fails: infrastructure problems degrade to
/// `ScoreResult::Fallback`.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(&self, resume: &str, job_description: &str) -> ScoreResult;

    fn provider_status(&self) -> ProviderStatus;
}

// ────────────────────────────────────────────────────────────────────────────
// ScoreEngine: embedding similarity with mock fallback
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm (primary path):
/// 1. Acquire the embedding provider (lazy, single-flight).
/// 2. Embed résumé and JD (mean pooling, normalized).
/// 3. Cosine similarity → percentage → ±10 jitter → clamp to [65, 95].
/// 4. Strengths/gaps from the keyword analyzer.
///
/// Any provider failure, or an empty input, yields the mock analysis.
pub struct ScoreEngine {
    provider: ProviderHandle,
    rng: Mutex<StdRng>,
}

impl ScoreEngine {
    pub fn new(provider: ProviderHandle, rng: StdRng) -> Self {
        Self {
            provider,
            rng: Mutex::new(rng),
        }
    }

    async fn primary(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<FitAnalysis, EmbeddingError> {
        let provider = self.provider.acquire().await?;

        let resume_embedding = provider.embed(resume, Pooling::Mean, true).await?;
        let job_embedding = provider.embed(job_description, Pooling::Mean, true).await?;

        let similarity = cosine_similarity(&resume_embedding, &job_embedding);
        let base_score = similarity_to_percent(similarity);
        let fit_score = {
            let mut rng = self.rng.lock().await;
            apply_jitter(base_score, &mut *rng)
        };

        debug!(
            backend = %provider.backend(),
            similarity,
            base_score,
            fit_score,
            "Computed embedding fit score"
        );

        let keywords = analyze_keywords(resume, job_description);

        Ok(FitAnalysis {
            fit_score,
            strengths: keywords.strengths,
            gaps: keywords.gaps,
            recommendations: keywords.recommendations,
        })
    }

    async fn fallback(&self) -> ScoreResult {
        let mut rng = self.rng.lock().await;
        ScoreResult::Fallback(mock_analysis(&mut *rng))
    }
}

#[async_trait]
impl FitScorer for ScoreEngine {
    async fn score(&self, resume: &str, job_description: &str) -> ScoreResult {
        if resume.trim().is_empty() || job_description.trim().is_empty() {
            warn!("Empty résumé or job description; serving fallback analysis");
            return self.fallback().await;
        }

        match self.primary(resume, job_description).await {
            Ok(analysis) => ScoreResult::Primary(analysis),
            Err(e) => {
                warn!(error = %e, "Embedding fit scoring failed; serving fallback analysis");
                self.fallback().await
            }
        }
    }

    fn provider_status(&self) -> ProviderStatus {
        self.provider.status()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackFitScorer: mock analysis only
// ────────────────────────────────────────────────────────────────────────────

pub struct FallbackFitScorer {
    rng: Mutex<StdRng>,
}

impl FallbackFitScorer {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl FitScorer for FallbackFitScorer {
    async fn score(&self, _resume: &str, _job_description: &str) -> ScoreResult {
        let mut rng = self.rng.lock().await;
        ScoreResult::Fallback(mock_analysis(&mut *rng))
    }

    fn provider_status(&self) -> ProviderStatus {
        ProviderStatus::Failed
    }
}

/// Adds uniform jitter in [-10, +10] and clamps into [65, 95]. The band
/// discards the similarity signal outside it.
pub fn apply_jitter<R: Rng + ?Sized>(base_score: u8, rng: &mut R) -> u8 {
    let jitter = rng.random_range(-JITTER..=JITTER);
    (f64::from(base_score) + jitter)
        .round()
        .clamp(f64::from(PRIMARY_MIN), f64::from(PRIMARY_MAX)) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;

    use super::*;
    use crate::embedding::handle::testing::{
        BrokenProvider, FixedProvider, Outcome, ScriptedLoader,
    };
    use crate::embedding::{Backend, EmbeddingProvider};

    fn engine_with(loader: Arc<ScriptedLoader>) -> ScoreEngine {
        ScoreEngine::new(
            ProviderHandle::new(loader, Duration::from_secs(5), true),
            StdRng::seed_from_u64(11),
        )
    }

    fn ready_engine(provider: Arc<dyn EmbeddingProvider>) -> (ScoreEngine, Arc<ScriptedLoader>) {
        let loader = Arc::new(ScriptedLoader::new(Outcome::Succeed, Outcome::Fail, provider));
        (engine_with(loader.clone()), loader)
    }

    const RESUME: &str = "CS student. Built REST services in Python, deployed with Docker.";
    const JD: &str = "Backend intern: Python, AWS, Docker, Kubernetes.";

    #[tokio::test]
    async fn test_primary_path_scores_in_band() {
        let (engine, _) = ready_engine(Arc::new(FixedProvider::uniform(vec![0.2, 0.4, 0.1])));

        for _ in 0..50 {
            let result = engine.score(RESUME, JD).await;
            assert!(!result.is_fallback());
            let score = result.analysis().fit_score;
            assert!((PRIMARY_MIN..=PRIMARY_MAX).contains(&score), "score was {score}");
        }
    }

    #[tokio::test]
    async fn test_primary_path_uses_keyword_analysis() {
        let (engine, _) = ready_engine(Arc::new(FixedProvider::uniform(vec![1.0, 0.0])));

        let analysis = engine.score(RESUME, JD).await.analysis().clone();

        assert_eq!(analysis.strengths, vec!["Python", "Docker"]);
        assert_eq!(analysis.gaps, vec!["AWS", "Kubernetes"]);
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_dissimilar_texts_clamped_to_band_floor() {
        // Orthogonal embeddings → similarity 0 → jitter can't lift it past 10.
        let provider = FixedProvider {
            backend: Backend::Accelerated,
            marker: "intern".to_string(),
            marked: vec![0.0, 1.0],
            unmarked: vec![1.0, 0.0],
        };
        let (engine, _) = ready_engine(Arc::new(provider));

        let result = engine.score(RESUME, JD).await;

        assert!(!result.is_fallback());
        assert_eq!(result.analysis().fit_score, PRIMARY_MIN);
    }

    #[tokio::test]
    async fn test_zero_embeddings_do_not_fault() {
        let (engine, _) = ready_engine(Arc::new(FixedProvider::uniform(vec![0.0; 8])));

        let result = engine.score(RESUME, JD).await;

        assert!(!result.is_fallback());
        assert_eq!(result.analysis().fit_score, PRIMARY_MIN);
    }

    #[tokio::test]
    async fn test_failed_initialization_serves_fallback() {
        let engine = engine_with(Arc::new(ScriptedLoader::failing()));

        let result = engine.score(RESUME, JD).await;

        assert!(result.is_fallback());
        let analysis = result.analysis();
        assert!((75..=94).contains(&analysis.fit_score));
        assert_eq!(analysis.strengths.len(), 3);
        assert_eq!(analysis.gaps.len(), 2);
        assert_eq!(engine.provider_status(), ProviderStatus::Failed);
    }

    #[tokio::test]
    async fn test_embed_failure_serves_fallback() {
        let (engine, _) = ready_engine(Arc::new(BrokenProvider));

        let result = engine.score(RESUME, JD).await;

        assert!(result.is_fallback());
        assert!((75..=94).contains(&result.analysis().fit_score));
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let (engine, loader) = ready_engine(Arc::new(FixedProvider::uniform(vec![1.0])));

        assert!(engine.score("", JD).await.is_fallback());
        assert!(engine.score(RESUME, "   \n").await.is_fallback());

        assert_eq!(loader.loads(), 0);
        assert_eq!(engine.provider_status(), ProviderStatus::Uninitialized);
    }

    #[tokio::test]
    async fn test_provider_initialized_once_across_calls() {
        let (engine, loader) = ready_engine(Arc::new(FixedProvider::uniform(vec![1.0])));

        for _ in 0..5 {
            engine.score(RESUME, JD).await;
        }

        assert_eq!(loader.loads(), 1);
    }

    #[tokio::test]
    async fn test_seeded_engines_agree() {
        let a = ready_engine(Arc::new(FixedProvider::uniform(vec![0.5, 0.5]))).0;
        let b = ready_engine(Arc::new(FixedProvider::uniform(vec![0.5, 0.5]))).0;

        assert_eq!(a.score(RESUME, JD).await, b.score(RESUME, JD).await);
    }

    #[tokio::test]
    async fn test_fallback_scorer_always_degrades() {
        let scorer = FallbackFitScorer::new(StdRng::seed_from_u64(3));

        let result = scorer.score(RESUME, JD).await;

        assert!(result.is_fallback());
        assert_eq!(scorer.provider_status(), ProviderStatus::Failed);
    }

    #[test]
    fn test_jitter_clamps_to_band() {
        let mut rng = StdRng::seed_from_u64(5);
        for base in [0u8, 40, 65, 80, 95, 100] {
            for _ in 0..200 {
                let score = apply_jitter(base, &mut rng);
                assert!((PRIMARY_MIN..=PRIMARY_MAX).contains(&score));
            }
        }
    }

    #[test]
    fn test_jitter_stays_within_ten_points_mid_band() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let score = apply_jitter(80, &mut rng);
            assert!((70..=90).contains(&score), "score was {score}");
        }
    }
}
