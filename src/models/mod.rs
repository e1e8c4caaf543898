// Model exports
pub mod criteria;
pub mod domain;
pub mod requests;
pub mod responses;

pub use criteria::FilterSpecification;
pub use domain::{Gender, Habit, ProfileRow, UsageLimits};
pub use requests::SearchRequest;
pub use responses::{AccessSummary, ErrorResponse, HealthResponse, PaginationResult, SearchResponse};
