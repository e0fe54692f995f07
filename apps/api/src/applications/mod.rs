// Application tracking: in-memory records, dashboard stats, pipeline breakdown.

pub mod handlers;
pub mod models;
pub mod stats;
pub mod store;
