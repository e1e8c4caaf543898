use serde::{Deserialize, Deserializer, Serialize};
use serde_json::map::Entry;
use serde_json::{Map, Value};
use validator::Validate;

use super::criteria::FilterSpecification;

/// Profile search request, from either the query string or a JSON body
///
/// Filter fields sit at the top level next to `page`, `limit` and `sort`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default, deserialize_with = "page_number")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "page_number")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub sort: Option<String>,
    #[validate(nested)]
    #[serde(flatten)]
    pub filters: FilterSpecification,
}

impl SearchRequest {
    /// Build a request from decoded query-string pairs
    ///
    /// A key given more than once (`religion=Islam&religion=Hindu`) becomes
    /// an array, so set filters collect every value.
    pub fn from_query_pairs(pairs: Vec<(String, String)>) -> Result<Self, serde_json::Error> {
        let mut fields = Map::new();
        for (key, value) in pairs {
            match fields.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(Value::String(value));
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Value::Array(values) => values.push(Value::String(value)),
                    existing => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, Value::String(value)]);
                    }
                },
            }
        }
        serde_json::from_value(Value::Object(fields))
    }
}

/// Pagination numbers are not sanitized like filters: a value that is not
/// an integer is a payload error, and out-of-range integers are left for
/// the paginator to reject.
fn page_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "expected an integer, got {}",
            other
        ))),
    }
}
