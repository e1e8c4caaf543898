// Core search exports
pub mod access;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod predicate;
pub mod search;
pub mod sort;

pub use access::{effective_limit, Allowance};
pub use error::SearchError;
pub use filters::build_search_predicate;
pub use pagination::{PageWindow, PaginationSettings, Paginator};
pub use predicate::{Condition, Predicate, SqlStatement, SqlValue, WhereClause};
pub use search::{count_statement, data_statement, ProfileSearch, QueryExecutor, UsageLimitsProvider};
pub use sort::SortKey;
