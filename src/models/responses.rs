use serde::{Deserialize, Serialize};
use crate::models::domain::ProfileRow;

/// Pagination metadata derived from (page, limit, total)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

/// How the caller's subscription shaped the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    /// The requested limit was reduced to fit the remaining quota
    pub limited: bool,
    /// Views left in the period, `None` when unlimited
    pub remaining: Option<i64>,
}

impl AccessSummary {
    pub fn unrestricted() -> Self {
        Self {
            limited: false,
            remaining: None,
        }
    }
}

/// Response for the profile search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub profiles: Vec<ProfileRow>,
    pub pagination: PaginationResult,
    pub access: AccessSummary,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
