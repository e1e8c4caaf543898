//! Placeholder-only SQL predicate accumulator.
//!
//! A [`Condition`] pairs an SQL fragment with the values bound to its `?`
//! placeholders. Fragments are assembled exclusively from `&'static str`
//! column names, operators and `?`, so caller input can only ever travel
//! through the parameter list.

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    UInt(u64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        SqlValue::UInt(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

/// One boolean SQL fragment and its bound values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    fragment: String,
    params: Vec<SqlValue>,
}

impl Condition {
    /// `column = TRUE`
    pub fn is_true(column: &'static str) -> Self {
        Self {
            fragment: format!("{} = TRUE", column),
            params: Vec::new(),
        }
    }

    /// `column = ?`
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, "=", value.into())
    }

    /// `column <> ?`
    pub fn not_eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, "<>", value.into())
    }

    /// `column >= ?`
    pub fn gte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, ">=", value.into())
    }

    /// `column <= ?`
    pub fn lte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, "<=", value.into())
    }

    fn compare(column: &'static str, op: &'static str, value: SqlValue) -> Self {
        Self {
            fragment: format!("{} {} ?", column, op),
            params: vec![value],
        }
    }

    /// `column IN (?, ?, ...)` sized to the non-empty entries of `values`
    ///
    /// Returns `None` when nothing is left after dropping blank entries:
    /// an empty set means "no constraint", never `IN ()`.
    pub fn in_set(column: &'static str, values: &[String]) -> Option<Self> {
        let params: Vec<SqlValue> = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(SqlValue::from)
            .collect();

        if params.is_empty() {
            return None;
        }

        let placeholders = vec!["?"; params.len()].join(", ");
        Some(Self {
            fragment: format!("{} IN ({})", column, placeholders),
            params,
        })
    }

    /// Case-insensitive substring match of `term` against any of `columns`
    ///
    /// Emits `(LOWER(a) LIKE ? OR LOWER(b) LIKE ?)` with one `%term%` value
    /// per column. LIKE wildcards inside the term are escaped with `\`.
    pub fn contains_any(columns: &[&'static str], term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return None;
        }

        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let fragments: Vec<String> = columns
            .iter()
            .map(|column| format!("LOWER({}) LIKE ?", column))
            .collect();

        Some(Self {
            fragment: format!("({})", fragments.join(" OR ")),
            params: vec![SqlValue::Text(pattern); columns.len()],
        })
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ordered accumulator of conditions joined by AND
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn and_opt(self, condition: Option<Condition>) -> Self {
        match condition {
            Some(condition) => self.and(condition),
            None => self,
        }
    }

    /// Fold the conditions into a `WHERE` clause and its parameter list
    pub fn build(self) -> WhereClause {
        let (fragments, params) = self.conditions.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut fragments, mut params), condition| {
                fragments.push(condition.fragment);
                params.extend(condition.params);
                (fragments, params)
            },
        );

        let sql = if fragments.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", fragments.join(" AND "))
        };

        WhereClause { sql, params }
    }
}

/// A rendered `WHERE` clause; empty `sql` means no restriction
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// A complete statement ready for the executor
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_predicate_renders_nothing() {
        let clause = Predicate::new().build();
        assert_eq!(clause.sql, "");
        assert!(clause.params.is_empty());
    }

    #[test]
    fn test_conditions_join_with_and_in_order() {
        let clause = Predicate::new()
            .and(Condition::is_true("p.profile_completed"))
            .and(Condition::gte("p.age", 25_i64))
            .and(Condition::lte("p.age", 32_i64))
            .build();

        assert_eq!(
            clause.sql,
            "WHERE p.profile_completed = TRUE AND p.age >= ? AND p.age <= ?"
        );
        assert_eq!(clause.params, vec![SqlValue::Int(25), SqlValue::Int(32)]);
    }

    #[test]
    fn test_in_set_sized_to_values() {
        let values = vec!["A".to_string(), " ".to_string(), "B".to_string()];
        let condition = Condition::in_set("p.religion", &values).unwrap();
        assert_eq!(condition.fragment(), "p.religion IN (?, ?)");
        assert_eq!(
            condition.params(),
            &[SqlValue::Text("A".into()), SqlValue::Text("B".into())]
        );
    }

    #[test]
    fn test_in_set_empty_is_omitted() {
        assert!(Condition::in_set("p.city", &[]).is_none());
        assert!(Condition::in_set("p.city", &["".to_string()]).is_none());
    }

    #[test]
    fn test_contains_any_binds_pattern_per_column() {
        let condition = Condition::contains_any(&["p.full_name", "p.about_me"], "Priya").unwrap();
        assert_eq!(
            condition.fragment(),
            "(LOWER(p.full_name) LIKE ? OR LOWER(p.about_me) LIKE ?)"
        );
        assert_eq!(
            condition.params(),
            &[SqlValue::Text("%priya%".into()), SqlValue::Text("%priya%".into())]
        );
    }

    #[test]
    fn test_contains_any_escapes_wildcards() {
        let condition = Condition::contains_any(&["p.full_name"], "100%_sure").unwrap();
        assert_eq!(condition.params(), &[SqlValue::Text("%100\\%\\_sure%".into())]);
    }

    #[test]
    fn test_injection_attempt_stays_in_params() {
        let hostile = "x'; DROP TABLE profiles; --";
        let clause = Predicate::new()
            .and_opt(Condition::contains_any(&["p.full_name"], hostile))
            .and_opt(Condition::in_set("p.city", &[hostile.to_string()]))
            .build();

        assert!(!clause.sql.contains("DROP"));
        assert_eq!(clause.params.len(), 2);
    }
}
