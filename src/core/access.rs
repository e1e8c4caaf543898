use crate::models::{AccessSummary, UsageLimits};

/// Row budget granted to one search request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    /// Rows the caller may receive; 0 when the quota is used up
    pub limit: u32,
    pub summary: AccessSummary,
}

impl Allowance {
    pub fn is_exhausted(&self) -> bool {
        self.limit == 0
    }
}

/// Cap the requested limit by the caller's remaining profile views
///
/// `effective = requested` for unlimited plans, otherwise
/// `min(requested, remaining)`.
pub fn effective_limit(requested: u32, usage: Option<&UsageLimits>) -> Allowance {
    let Some(remaining) = usage.and_then(UsageLimits::remaining) else {
        return Allowance {
            limit: requested,
            summary: AccessSummary::unrestricted(),
        };
    };

    let limit = u32::try_from(remaining).unwrap_or(u32::MAX).min(requested);
    Allowance {
        limit,
        summary: AccessSummary {
            limited: limit < requested,
            remaining: Some(remaining),
        },
    }
}
