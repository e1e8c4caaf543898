//! Matrimony Search - profile search service for a matrimonial platform
//!
//! This library provides the filtered, sorted and paginated profile search
//! used by the matrimony app. Filters are compiled into placeholder-only SQL,
//! counted and fetched concurrently, and capped by the caller's
//! subscription allowance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ProfileSearch, QueryExecutor, SearchError, SortKey, UsageLimitsProvider};
pub use crate::models::{FilterSpecification, PaginationResult, ProfileRow, SearchResponse, UsageLimits};
