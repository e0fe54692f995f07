//! In-memory application store. Lives for the process; nothing is persisted.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::applications::models::{ApplicationRecord, ApplicationStatus, NewApplication};
use crate::errors::AppError;

#[derive(Clone, Default)]
pub struct ApplicationStore {
    records: Arc<RwLock<Vec<ApplicationRecord>>>,
}

impl ApplicationStore {
    pub fn new(records: Vec<ApplicationRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Store pre-filled with the demo applications.
    pub fn seeded() -> Self {
        Self::new(seed_applications())
    }

    /// Newest `applied_date` first, optionally narrowed to one status.
    pub async fn list(&self, status: Option<ApplicationStatus>) -> Vec<ApplicationRecord> {
        let records = self.records.read().await;
        let mut out: Vec<ApplicationRecord> = records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        out
    }

    pub async fn get(&self, id: Uuid) -> Option<ApplicationRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn create(&self, new: NewApplication) -> Result<ApplicationRecord, AppError> {
        if new.company.trim().is_empty() {
            return Err(AppError::Validation("company cannot be empty".to_string()));
        }
        if new.role.trim().is_empty() {
            return Err(AppError::Validation("role cannot be empty".to_string()));
        }
        if new.fit_score > 100 {
            return Err(AppError::Validation(format!(
                "fit_score must be between 0 and 100, got {}",
                new.fit_score
            )));
        }

        let record = ApplicationRecord {
            id: Uuid::new_v4(),
            company: new.company.trim().to_string(),
            role: new.role.trim().to_string(),
            status: new.status,
            fit_score: new.fit_score,
            applied_date: new.applied_date,
            location: new.location,
            salary: new.salary,
            logo: new.logo,
        };

        self.records.write().await.push(record.clone());
        info!(id = %record.id, company = %record.company, "Application created");
        Ok(record)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, AppError> {
        self.modify(id, |r| r.status = status).await
    }

    /// Scores are clamped into [0, 100].
    pub async fn set_fit_score(&self, id: Uuid, fit_score: u8) -> Result<ApplicationRecord, AppError> {
        self.modify(id, |r| r.fit_score = fit_score.min(100)).await
    }

    async fn modify<F>(&self, id: Uuid, apply: F) -> Result<ApplicationRecord, AppError>
    where
        F: FnOnce(&mut ApplicationRecord),
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        apply(record);
        Ok(record.clone())
    }
}

/// Demo applications the dashboard boots with.
pub fn seed_applications() -> Vec<ApplicationRecord> {
    let seed = [
        ("Google", "Software Engineering Intern", ApplicationStatus::Interview, 94, (2024, 1, 15), "Mountain View, CA", "$8,000/month", "🔍"),
        ("Meta", "Product Manager Intern", ApplicationStatus::Screening, 87, (2024, 1, 12), "Menlo Park, CA", "$7,500/month", "📘"),
        ("Microsoft", "Data Science Intern", ApplicationStatus::Applied, 91, (2024, 1, 10), "Redmond, WA", "$7,000/month", "🪟"),
        ("Amazon", "Cloud Engineering Intern", ApplicationStatus::Offer, 89, (2024, 1, 8), "Seattle, WA", "$6,800/month", "📦"),
        ("Netflix", "Machine Learning Intern", ApplicationStatus::Rejected, 76, (2024, 1, 5), "Los Gatos, CA", "$8,500/month", "🎬"),
    ];

    seed.into_iter()
        .filter_map(|(company, role, status, fit_score, (y, m, d), location, salary, logo)| {
            Some(ApplicationRecord {
                id: Uuid::new_v4(),
                company: company.to_string(),
                role: role.to_string(),
                status,
                fit_score,
                applied_date: NaiveDate::from_ymd_opt(y, m, d)?,
                location: location.to_string(),
                salary: salary.to_string(),
                logo: Some(logo.to_string()),
            })
        })
        .collect()
}
