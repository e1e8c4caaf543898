use async_trait::async_trait;
use sqlx::MySqlPool;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::{PlanSettings, SubscriptionSettings};
use crate::core::UsageLimitsProvider;
use crate::models::UsageLimits;
use crate::services::DatabaseError;

/// Plan name to feature lookup with a fallback plan
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: HashMap<String, PlanSettings>,
    default_plan: String,
}

impl PlanCatalog {
    pub fn new(plans: HashMap<String, PlanSettings>, default_plan: impl Into<String>) -> Self {
        let plans = plans
            .into_iter()
            .map(|(name, features)| (name.to_lowercase(), features))
            .collect();
        Self {
            plans,
            default_plan: default_plan.into().to_lowercase(),
        }
    }

    pub fn default_plan(&self) -> &str {
        &self.default_plan
    }

    /// Features for `plan`, falling back to the default plan
    ///
    /// An unconfigured default plan grants no profile views.
    pub fn features_for(&self, plan: &str) -> PlanSettings {
        self.plans
            .get(&plan.to_lowercase())
            .or_else(|| self.plans.get(&self.default_plan))
            .copied()
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Plan '{}' and default plan '{}' are not configured, granting no views",
                    plan,
                    self.default_plan
                );
                PlanSettings::default()
            })
    }
}

/// Subscription lookup backed by the `subscriptions` and `profile_views`
/// tables
///
/// The active plan name is cached per user; the daily usage count is
/// always read fresh.
pub struct SubscriptionService {
    pool: MySqlPool,
    catalog: PlanCatalog,
    plan_cache: moka::future::Cache<u64, String>,
}

impl SubscriptionService {
    pub fn new(pool: MySqlPool, settings: &SubscriptionSettings) -> Self {
        let plan_cache = moka::future::CacheBuilder::new(settings.cache_size.unwrap_or(10_000))
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs.unwrap_or(60)))
            .build();

        Self {
            pool,
            catalog: PlanCatalog::new(settings.plans.clone(), settings.default_plan.clone()),
            plan_cache,
        }
    }

    /// Name of the user's active plan, or the default plan
    pub async fn active_plan(&self, user_id: u64) -> Result<String, DatabaseError> {
        if let Some(plan) = self.plan_cache.get(&user_id).await {
            tracing::trace!("Plan cache hit: {}", user_id);
            return Ok(plan);
        }

        let query = r#"
            SELECT plan
            FROM subscriptions
            WHERE user_id = ? AND status = 'active' AND end_date > NOW()
            ORDER BY end_date DESC
            LIMIT 1
        "#;

        let plan: Option<String> = sqlx::query_scalar(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let plan = plan.unwrap_or_else(|| self.catalog.default_plan().to_string());
        self.plan_cache.insert(user_id, plan.clone()).await;

        Ok(plan)
    }

    /// Profiles viewed by the user since midnight (server time)
    pub async fn views_today(&self, user_id: u64) -> Result<i64, DatabaseError> {
        let query = r#"
            SELECT COUNT(*)
            FROM profile_views
            WHERE viewer_id = ? AND viewed_at >= CURDATE()
        "#;

        let used: i64 = sqlx::query_scalar(query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(used)
    }
}

#[async_trait]
impl UsageLimitsProvider for SubscriptionService {
    async fn usage_limits(&self, user_id: u64) -> Result<UsageLimits, DatabaseError> {
        let plan = self.active_plan(user_id).await?;
        let features = self.catalog.features_for(&plan);

        if features.profile_views == UsageLimits::UNLIMITED {
            return Ok(UsageLimits::unlimited());
        }

        let used = self.views_today(user_id).await?;
        tracing::debug!(
            "User {} on plan '{}' has used {}/{} profile views",
            user_id,
            plan,
            used,
            features.profile_views
        );

        Ok(UsageLimits {
            profile_views: features.profile_views,
            profile_views_used: used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PlanCatalog {
        let mut plans = HashMap::new();
        plans.insert("free".to_string(), PlanSettings { profile_views: 5 });
        plans.insert("Premium".to_string(), PlanSettings { profile_views: -1 });
        PlanCatalog::new(plans, "free")
    }

    #[test]
    fn test_known_plan() {
        assert_eq!(catalog().features_for("premium").profile_views, -1);
        assert_eq!(catalog().features_for("FREE").profile_views, 5);
    }

    #[test]
    fn test_unknown_plan_uses_default() {
        assert_eq!(catalog().features_for("platinum").profile_views, 5);
    }

    #[test]
    fn test_missing_default_grants_nothing() {
        let catalog = PlanCatalog::new(HashMap::new(), "free");
        assert_eq!(catalog.features_for("free").profile_views, 0);
    }
}
