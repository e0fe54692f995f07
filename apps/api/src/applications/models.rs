use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Screening,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Pipeline order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    /// Badge text on an application card.
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Phone Screen",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Column heading on the pipeline board.
    pub fn stage_label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Anything past `Applied` counts as a response from the company.
    pub fn is_response(self) -> bool {
        self != ApplicationStatus::Applied
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub fit_score: u8, // 0 – 100
    pub applied_date: NaiveDate,
    pub location: String,
    pub salary: String,
    pub logo: Option<String>,
}

/// Application as served over the API: the stored record plus the badge
/// text for its status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub status_label: &'static str,
}

impl From<ApplicationRecord> for ApplicationView {
    fn from(record: ApplicationRecord) -> Self {
        let status_label = record.status.label();
        Self {
            record,
            status_label,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    #[serde(default = "default_status")]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub fit_score: u8,
    pub applied_date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    pub logo: Option<String>,
}

fn default_status() -> ApplicationStatus {
    ApplicationStatus::Applied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_lowercase() {
        let status: ApplicationStatus = serde_json::from_str(r#""interview""#).unwrap();
        assert_eq!(status, ApplicationStatus::Interview);
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Offer).unwrap(),
            r#""offer""#
        );
    }

    #[test]
    fn test_screening_labels_differ_by_surface() {
        assert_eq!(ApplicationStatus::Screening.label(), "Phone Screen");
        assert_eq!(ApplicationStatus::Screening.stage_label(), "Screening");
    }

    #[test]
    fn test_view_flattens_record_and_adds_status_label() {
        let record = ApplicationRecord {
            id: Uuid::nil(),
            company: "Meta".to_string(),
            role: "Data Science Intern".to_string(),
            status: ApplicationStatus::Screening,
            fit_score: 88,
            applied_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            location: "Menlo Park, CA".to_string(),
            salary: "$7,500/month".to_string(),
            logo: None,
        };

        let json = serde_json::to_value(ApplicationView::from(record)).unwrap();

        assert_eq!(json["company"], "Meta");
        assert_eq!(json["status"], "screening");
        assert_eq!(json["status_label"], "Phone Screen");
    }

    #[test]
    fn test_only_applied_is_not_a_response() {
        let responses: Vec<_> = ApplicationStatus::ALL
            .into_iter()
            .filter(|s| s.is_response())
            .collect();
        assert_eq!(responses.len(), 4);
        assert!(!ApplicationStatus::Applied.is_response());
    }

    #[test]
    fn test_new_application_defaults() {
        let json = r#"{"company": "Stripe", "role": "SWE Intern", "applied_date": "2024-02-01"}"#;
        let new: NewApplication = serde_json::from_str(json).unwrap();
        assert_eq!(new.status, ApplicationStatus::Applied);
        assert_eq!(new.fit_score, 0);
        assert!(new.logo.is_none());
    }
}
