use serde::{Deserialize, Serialize};

/// Full fit analysis returned to callers. Built fresh per scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitAnalysis {
    pub fit_score: u8,                // 0 – 100
    pub strengths: Vec<String>,       // 1 – 3 entries
    pub gaps: Vec<String>,            // 1 – 2 entries
    pub recommendations: Vec<String>, // fixed advisory strings
}

/// Tags whether the analysis came from a real embedding comparison or from
/// the degraded mock path. Either way the caller gets a valid analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "analysis", rename_all = "lowercase")]
pub enum ScoreResult {
    Primary(FitAnalysis),
    Fallback(FitAnalysis),
}

impl ScoreResult {
    pub fn analysis(&self) -> &FitAnalysis {
        match self {
            ScoreResult::Primary(a) | ScoreResult::Fallback(a) => a,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreResult::Fallback(_))
    }
}

/// Human label for a fit score, as shown on application cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Weak,
}

impl MatchQuality {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => MatchQuality::Excellent,
            80..=89 => MatchQuality::Good,
            70..=79 => MatchQuality::Fair,
            _ => MatchQuality::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Excellent Match",
            MatchQuality::Good => "Good Match",
            MatchQuality::Fair => "Fair Match",
            MatchQuality::Weak => "Weak Match",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(score: u8) -> FitAnalysis {
        FitAnalysis {
            fit_score: score,
            strengths: vec!["Python".to_string()],
            gaps: vec!["AWS".to_string()],
            recommendations: vec!["Practice coding problems".to_string()],
        }
    }

    #[test]
    fn test_score_result_serializes_with_mode_tag() {
        let json = serde_json::to_value(ScoreResult::Fallback(analysis(80))).unwrap();
        assert_eq!(json["mode"], "fallback");
        assert_eq!(json["analysis"]["fit_score"], 80);
        assert_eq!(json["analysis"]["strengths"][0], "Python");
    }

    #[test]
    fn test_score_result_accessors() {
        let primary = ScoreResult::Primary(analysis(70));
        assert!(!primary.is_fallback());
        assert_eq!(primary.analysis().fit_score, 70);
        assert_eq!(primary.analysis(), &analysis(70));
    }

    #[test]
    fn test_match_quality_thresholds() {
        assert_eq!(MatchQuality::from_score(100), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_score(90), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_score(89), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(80), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(79), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_score(70), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_score(69), MatchQuality::Weak);
        assert_eq!(MatchQuality::from_score(0), MatchQuality::Weak);
    }

    #[test]
    fn test_match_quality_label() {
        assert_eq!(MatchQuality::Good.label(), "Good Match");
    }
}
