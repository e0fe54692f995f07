//! Market trends: static responder. Returns the same snapshot for any input;
//! there is no market data source behind it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTrend {
    pub average: u32,
    /// Year-over-year growth, percent.
    pub growth: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrends {
    pub trending: Vec<String>,
    pub salary_trends: SalaryTrend,
    pub demand_level: String,
    pub competition_level: String,
}

pub fn market_trends(_job_titles: &[String]) -> MarketTrends {
    MarketTrends {
        trending: vec![
            "AI/ML Engineer".to_string(),
            "Cloud Developer".to_string(),
            "DevOps Engineer".to_string(),
        ],
        salary_trends: SalaryTrend {
            average: 85_000,
            growth: 12,
        },
        demand_level: "High".to_string(),
        competition_level: "Medium".to_string(),
    }
}
