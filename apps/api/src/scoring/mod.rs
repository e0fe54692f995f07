// Job-fit scoring: embedding similarity, keyword analysis, mock fallback.
// All embedding calls go through crate::embedding; no backend calls here.

pub mod engine;
pub mod fallback;
pub mod handlers;
pub mod keywords;
pub mod market;
pub mod models;
pub mod similarity;
