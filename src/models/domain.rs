use serde::{Deserialize, Serialize};

/// Profile gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Smoking / drinking habit as stored on the profile
///
/// `no` and `yes` are accepted on input as aliases of `never` and `regularly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Never,
    Occasionally,
    Regularly,
}

impl Habit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::Never => "never",
            Habit::Occasionally => "occasionally",
            Habit::Regularly => "regularly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "never" | "no" => Some(Habit::Never),
            "occasionally" => Some(Habit::Occasionally),
            "regularly" | "yes" => Some(Habit::Regularly),
            _ => None,
        }
    }
}

/// Read-only search projection of a profile joined with its account and
/// active subscription.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow {
    pub id: u64,
    pub user_id: u64,
    pub full_name: String,
    pub gender: String,
    pub age: Option<i32>,
    pub religion: Option<String>,
    pub cast: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub education: Option<String>,
    pub annual_income: Option<i64>,
    pub marital_status: Option<String>,
    pub smoking: Option<String>,
    pub drinking: Option<String>,
    pub about_me: Option<String>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub view_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub subscription_plan: Option<String>,
}

/// Profile-view allowance reported by the subscription lookup
///
/// `profile_views == -1` means the plan is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLimits {
    pub profile_views: i64,
    #[serde(default)]
    pub profile_views_used: i64,
}

impl UsageLimits {
    pub const UNLIMITED: i64 = -1;

    pub fn unlimited() -> Self {
        Self {
            profile_views: Self::UNLIMITED,
            profile_views_used: 0,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.profile_views == Self::UNLIMITED
    }

    /// Views left in the current period, `None` when unlimited
    pub fn remaining(&self) -> Option<i64> {
        if self.is_unlimited() {
            None
        } else {
            Some((self.profile_views - self.profile_views_used).max(0))
        }
    }
}
