use serde::{Deserialize, Serialize};
use validator::Validate;

use super::domain::{Gender, Habit};

/// Caller-supplied search criteria
///
/// Every field is optional. Set-valued fields are OR-ed internally and
/// AND-ed with each other. Malformed input never fails deserialization:
/// it degrades to "no constraint" (see [`lenient`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpecification {
    #[serde(deserialize_with = "lenient::gender")]
    pub gender: Option<Gender>,
    #[serde(deserialize_with = "lenient::number")]
    pub min_age: Option<i64>,
    #[serde(deserialize_with = "lenient::number")]
    pub max_age: Option<i64>,
    #[serde(deserialize_with = "lenient::set")]
    pub religion: Vec<String>,
    #[serde(deserialize_with = "lenient::set")]
    pub cast: Vec<String>,
    #[serde(deserialize_with = "lenient::set")]
    pub city: Vec<String>,
    #[serde(deserialize_with = "lenient::set")]
    pub state: Vec<String>,
    #[serde(deserialize_with = "lenient::set")]
    pub country: Vec<String>,
    #[serde(deserialize_with = "lenient::set")]
    pub education: Vec<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub min_income: Option<i64>,
    #[serde(deserialize_with = "lenient::number")]
    pub max_income: Option<i64>,
    #[serde(deserialize_with = "lenient::set")]
    pub marital_status: Vec<String>,
    #[serde(deserialize_with = "lenient::habit")]
    pub smoking: Option<Habit>,
    #[serde(deserialize_with = "lenient::habit")]
    pub drinking: Option<Habit>,
    #[serde(deserialize_with = "lenient::flag")]
    pub verified: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub featured: bool,
    /// Free-text term matched against name and about-text
    #[validate(length(max = 100))]
    #[serde(deserialize_with = "lenient::text")]
    pub search: Option<String>,
}

/// Permissive deserializers for filter input.
///
/// Each one reads an arbitrary [`serde_json::Value`] and maps anything it
/// cannot use to the field's empty value instead of returning an error.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::models::domain::{Gender, Habit};

    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => non_empty(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn non_empty(s: &str) -> Option<String> {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Array, comma-separated string, or single scalar
    pub fn set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
            Value::String(s) => s.split(',').filter_map(non_empty).collect(),
            other @ (Value::Number(_) | Value::Bool(_)) => {
                scalar_to_string(&other).into_iter().collect()
            }
            _ => Vec::new(),
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
            _ => false,
        })
    }

    pub fn gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Gender>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Gender::parse))
    }

    pub fn habit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Habit>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Habit::parse))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(_) | Value::Object(_) | Value::Null => None,
            other => scalar_to_string(&other),
        })
    }
}
