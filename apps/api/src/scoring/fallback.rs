//! Mock analysis served whenever the embedding path is unavailable.

use rand::Rng;

use super::keywords::to_owned;
use super::models::FitAnalysis;

pub const MOCK_SCORE_BASE: u8 = 75;
/// Exclusive upper bound of the random offset; scores land in [75, 94].
pub const MOCK_SCORE_SPREAD: u8 = 20;

pub const MOCK_STRENGTHS: [&str; 3] = [
    "Strong programming background",
    "Relevant internship experience",
    "Good academic record",
];

pub const MOCK_GAPS: [&str; 2] = ["Cloud computing experience", "System design knowledge"];

pub const MOCK_RECOMMENDATIONS: [&str; 3] = [
    "Prepare for technical interviews",
    "Study system design fundamentals",
    "Practice coding problems",
];

pub fn mock_analysis<R: Rng + ?Sized>(rng: &mut R) -> FitAnalysis {
    FitAnalysis {
        fit_score: MOCK_SCORE_BASE + rng.random_range(0..MOCK_SCORE_SPREAD),
        strengths: to_owned(&MOCK_STRENGTHS),
        gaps: to_owned(&MOCK_GAPS),
        recommendations: to_owned(&MOCK_RECOMMENDATIONS),
    }
}
