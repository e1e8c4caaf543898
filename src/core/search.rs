use async_trait::async_trait;
use std::sync::Arc;

use crate::core::access::effective_limit;
use crate::core::error::SearchError;
use crate::core::filters::build_search_predicate;
use crate::core::pagination::{PageWindow, PaginationSettings, Paginator};
use crate::core::predicate::{SqlStatement, SqlValue, WhereClause};
use crate::core::sort::SortKey;
use crate::models::{FilterSpecification, PaginationResult, ProfileRow, SearchResponse, UsageLimits};
use crate::services::DatabaseError;

/// Runs parameterized statements against the profile store
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a `SELECT COUNT(*)` statement
    async fn count(&self, statement: &SqlStatement) -> Result<u64, DatabaseError>;

    /// Run a profile projection statement
    async fn fetch_profiles(&self, statement: &SqlStatement) -> Result<Vec<ProfileRow>, DatabaseError>;

    /// Whether the store is reachable
    async fn health_check(&self) -> Result<bool, DatabaseError> {
        Ok(true)
    }
}

/// Reports a user's profile-view allowance for the current period
#[async_trait]
pub trait UsageLimitsProvider: Send + Sync {
    async fn usage_limits(&self, user_id: u64) -> Result<UsageLimits, DatabaseError>;
}

const FROM_PROFILES: &str = "FROM profiles p INNER JOIN users u ON u.id = p.user_id";

const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.full_name, p.gender, p.age, p.religion, \
    p.cast, p.city, p.state, p.country, p.education, p.annual_income, p.marital_status, \
    p.smoking, p.drinking, p.about_me, p.is_verified, p.is_featured, p.view_count, \
    p.created_at, \
    (SELECT s.plan FROM subscriptions s WHERE s.user_id = p.user_id AND s.status = 'active' \
    AND s.end_date > NOW() ORDER BY s.end_date DESC LIMIT 1) AS subscription_plan";

fn join_clause(head: String, clause: &WhereClause) -> String {
    if clause.sql.is_empty() {
        head
    } else {
        format!("{} {}", head, clause.sql)
    }
}

/// `SELECT COUNT(*)` over the predicate; no ordering or limit
pub fn count_statement(clause: &WhereClause) -> SqlStatement {
    SqlStatement {
        sql: join_clause(format!("SELECT COUNT(*) AS total {}", FROM_PROFILES), clause),
        params: clause.params.clone(),
    }
}

/// Profile projection over the same predicate, ordered and windowed
///
/// Parameters are the predicate's, followed by `LIMIT` and `OFFSET`.
pub fn data_statement(clause: &WhereClause, sort: SortKey, window: &PageWindow) -> SqlStatement {
    let sql = format!(
        "{} ORDER BY {} LIMIT ? OFFSET ?",
        join_clause(format!("SELECT {} {}", PROFILE_COLUMNS, FROM_PROFILES), clause),
        sort.order_by()
    );

    let mut params = clause.params.clone();
    params.push(SqlValue::UInt(window.limit as u64));
    params.push(SqlValue::UInt(window.offset));

    SqlStatement { sql, params }
}

/// Profile search pipeline: predicate, sort, tier gate, count + data
#[derive(Clone)]
pub struct ProfileSearch {
    executor: Arc<dyn QueryExecutor>,
    usage: Option<Arc<dyn UsageLimitsProvider>>,
    paginator: Paginator,
}

impl ProfileSearch {
    pub fn new(executor: Arc<dyn QueryExecutor>, settings: PaginationSettings) -> Self {
        Self {
            executor,
            usage: None,
            paginator: Paginator::new(settings),
        }
    }

    /// Gate result sizes by the current user's subscription allowance
    pub fn with_usage_limits(mut self, usage: Arc<dyn UsageLimitsProvider>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub async fn health_check(&self) -> bool {
        self.executor.health_check().await.unwrap_or(false)
    }

    /// Search complete, active profiles matching `filters`
    ///
    /// Pagination is validated before any I/O. The count and data queries
    /// run concurrently and either failure fails the whole search.
    pub async fn search(
        &self,
        filters: &FilterSpecification,
        sort: SortKey,
        page: Option<i64>,
        limit: Option<i64>,
        current_user_id: Option<u64>,
    ) -> Result<SearchResponse, SearchError> {
        let window = self.paginator.window(page, limit)?;

        let usage = match (current_user_id, &self.usage) {
            (Some(user_id), Some(provider)) => Some(provider.usage_limits(user_id).await?),
            _ => None,
        };
        let allowance = effective_limit(window.limit, usage.as_ref());

        let clause = build_search_predicate(filters, current_user_id);
        let count = count_statement(&clause);

        tracing::debug!(
            "Search predicate: {} ({} params)",
            clause.sql,
            clause.params.len()
        );

        let (profiles, pagination) = if allowance.is_exhausted() {
            tracing::info!(
                "Profile view quota exhausted for user {:?}, returning counts only",
                current_user_id
            );
            let total = self.executor.count(&count).await?;
            (
                Vec::new(),
                PaginationResult::from_total(window.page, window.limit, total),
            )
        } else {
            let window = window.with_limit(allowance.limit);
            let data = data_statement(&clause, sort, &window);
            let (total, profiles) = tokio::try_join!(
                self.executor.count(&count),
                self.executor.fetch_profiles(&data),
            )?;
            (
                profiles,
                PaginationResult::from_total(window.page, window.limit, total),
            )
        };

        tracing::info!(
            "Search returned {} of {} profiles (page {}/{}, limit {}, sort {:?})",
            profiles.len(),
            pagination.total_items,
            pagination.current_page,
            pagination.total_pages,
            pagination.items_per_page,
            sort
        );

        Ok(SearchResponse {
            profiles,
            pagination,
            access: allowance.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause() -> WhereClause {
        build_search_predicate(
            &FilterSpecification {
                religion: vec!["Islam".into()],
                ..Default::default()
            },
            Some(7),
        )
    }

    #[test]
    fn test_count_statement_has_no_trailing_clauses() {
        let statement = count_statement(&clause());
        assert!(statement.sql.starts_with("SELECT COUNT(*) AS total FROM profiles p"));
        assert!(!statement.sql.contains("ORDER BY"));
        assert!(!statement.sql.contains("LIMIT"));
        assert_eq!(statement.params, clause().params);
    }

    #[test]
    fn test_data_statement_shares_predicate() {
        let paginator = Paginator::new(PaginationSettings::default());
        let window = paginator.window(Some(2), Some(10)).unwrap();
        let count = count_statement(&clause());
        let data = data_statement(&clause(), SortKey::AgeAsc, &window);

        assert!(data.sql.contains(&clause().sql));
        assert!(data.sql.ends_with("ORDER BY p.age ASC LIMIT ? OFFSET ?"));
        assert_eq!(&data.params[..count.params.len()], &count.params[..]);
        assert_eq!(
            &data.params[count.params.len()..],
            &[SqlValue::UInt(10), SqlValue::UInt(10)]
        );
        assert_eq!(data.sql.matches('?').count(), data.params.len());
    }

    #[test]
    fn test_empty_clause_renders_without_where() {
        let empty = WhereClause { sql: String::new(), params: vec![] };
        assert_eq!(
            count_statement(&empty).sql,
            "SELECT COUNT(*) AS total FROM profiles p INNER JOIN users u ON u.id = p.user_id"
        );
    }
}
