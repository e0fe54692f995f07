use serde::{Deserialize, Serialize};

use crate::applications::models::{ApplicationRecord, ApplicationStatus};

/// Headline numbers for the dashboard stat cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub response_rate: u32, // percent of applications past `applied`
    pub avg_fit_score: u32,
    pub interviews: usize,
    pub offers: usize,
}

/// One column of the pipeline board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub status: ApplicationStatus,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Empty input yields all zeros rather than NaN rates.
pub fn compute_dashboard_stats(applications: &[ApplicationRecord]) -> DashboardStats {
    let total = applications.len();
    let responses = applications.iter().filter(|a| a.status.is_response()).count();
    let fit_sum: u32 = applications.iter().map(|a| u32::from(a.fit_score)).sum();

    DashboardStats {
        total_applications: total,
        response_rate: rounded_percent(responses, total),
        avg_fit_score: if total == 0 {
            0
        } else {
            (f64::from(fit_sum) / total as f64).round() as u32
        },
        interviews: count_status(applications, ApplicationStatus::Interview),
        offers: count_status(applications, ApplicationStatus::Offer),
    }
}

/// Count and share of every stage, in pipeline order.
pub fn pipeline_breakdown(applications: &[ApplicationRecord]) -> Vec<PipelineStage> {
    let total = applications.len();
    ApplicationStatus::ALL
        .into_iter()
        .map(|status| {
            let count = count_status(applications, status);
            PipelineStage {
                status,
                label: status.stage_label().to_string(),
                count,
                percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
            }
        })
        .collect()
}

fn count_status(applications: &[ApplicationRecord], status: ApplicationStatus) -> usize {
    applications.iter().filter(|a| a.status == status).count()
}

fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
