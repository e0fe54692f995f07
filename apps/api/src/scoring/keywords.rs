//! Keyword analyzer: derives strengths and gaps by comparing skill mentions
//! between a job description and a résumé.
//!
//! Runs on every primary-path score to fill in the analysis; the fallback
//! path uses fixed literals instead.

/// Reference vocabulary. Extraction preserves this order, not the order of
/// occurrence in the text.
pub const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "AWS",
    "Docker",
    "Kubernetes",
    "Machine Learning",
    "Data Science",
    "SQL",
    "TypeScript",
    "Git",
    "Agile",
    "System Design",
    "Algorithms",
    "Data Structures",
];

pub const MAX_STRENGTHS: usize = 3;
pub const MAX_GAPS: usize = 2;

/// Substituted when no job-description skill is matched by the résumé.
pub const DEFAULT_STRENGTHS: [&str; 3] = [
    "Strong technical background",
    "Relevant experience",
    "Good communication skills",
];

/// Substituted when every job-description skill is covered (or none were found).
pub const DEFAULT_GAPS: [&str; 2] = ["Cloud platforms experience", "Advanced algorithms knowledge"];

pub const RECOMMENDATIONS: [&str; 3] = [
    "Highlight relevant projects in your resume",
    "Practice system design concepts",
    "Prepare for behavioral questions",
];

/// Returns the vocabulary entries occurring in `text` as a case-insensitive substring.
pub fn extract_skills<'v>(text: &str, vocabulary: &[&'v str]) -> Vec<&'v str> {
    let text_lower = text.to_lowercase();
    vocabulary
        .iter()
        .copied()
        .filter(|skill| text_lower.contains(&skill.to_lowercase()))
        .collect()
}

/// Job-description skills split by whether the résumé covers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillComparison<'v> {
    pub matching: Vec<&'v str>,
    pub missing: Vec<&'v str>,
}

/// A JD skill matches when it is a case-insensitive substring of any skill
/// label extracted from the résumé.
pub fn compare_skills<'v>(jd_skills: &[&'v str], resume_skills: &[&str]) -> SkillComparison<'v> {
    let resume_lower: Vec<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();

    let (matching, missing) = jd_skills.iter().copied().partition(|skill| {
        let skill_lower = skill.to_lowercase();
        resume_lower.iter().any(|r| r.contains(&skill_lower))
    });

    SkillComparison { matching, missing }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordAnalysis {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

/// First 3 matching skills as strengths, first 2 missing skills as gaps.
/// An empty side is replaced by its fixed literal list; a non-empty side is
/// never padded.
pub fn analyze_keywords(resume: &str, job_description: &str) -> KeywordAnalysis {
    let jd_skills = extract_skills(job_description, SKILL_VOCABULARY);
    let resume_skills = extract_skills(resume, SKILL_VOCABULARY);
    let comparison = compare_skills(&jd_skills, &resume_skills);

    KeywordAnalysis {
        strengths: take_or_default(&comparison.matching, MAX_STRENGTHS, &DEFAULT_STRENGTHS),
        gaps: take_or_default(&comparison.missing, MAX_GAPS, &DEFAULT_GAPS),
        recommendations: to_owned(&RECOMMENDATIONS),
    }
}

fn take_or_default(found: &[&str], limit: usize, default: &[&str]) -> Vec<String> {
    if found.is_empty() {
        to_owned(default)
    } else {
        to_owned(&found[..found.len().min(limit)])
    }
}

pub(crate) fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
