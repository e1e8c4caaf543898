use crate::core::predicate::{Condition, Predicate, WhereClause};
use crate::models::FilterSpecification;

/// Column names read by the search, qualified with their table aliases
/// (`p` = profiles, `u` = users)
pub mod columns {
    pub const PROFILE_COMPLETED: &str = "p.profile_completed";
    pub const USER_ACTIVE: &str = "u.is_active";
    pub const USER_ID: &str = "p.user_id";
    pub const GENDER: &str = "p.gender";
    pub const AGE: &str = "p.age";
    pub const RELIGION: &str = "p.religion";
    pub const CAST: &str = "p.cast";
    pub const CITY: &str = "p.city";
    pub const STATE: &str = "p.state";
    pub const COUNTRY: &str = "p.country";
    pub const EDUCATION: &str = "p.education";
    pub const ANNUAL_INCOME: &str = "p.annual_income";
    pub const MARITAL_STATUS: &str = "p.marital_status";
    pub const SMOKING: &str = "p.smoking";
    pub const DRINKING: &str = "p.drinking";
    pub const IS_VERIFIED: &str = "p.is_verified";
    pub const IS_FEATURED: &str = "p.is_featured";
    pub const FULL_NAME: &str = "p.full_name";
    pub const ABOUT_ME: &str = "p.about_me";
}

/// Build the search-mode `WHERE` clause for `filters`
///
/// Condition order is fixed: the structural flags (complete profile,
/// active account), then self-exclusion, then the optional filters in
/// field order. The clause is never empty in search mode.
pub fn build_search_predicate(
    filters: &FilterSpecification,
    exclude_user_id: Option<u64>,
) -> WhereClause {
    structural_predicate(exclude_user_id)
        .and_opt(filters.gender.map(|g| Condition::eq(columns::GENDER, g.as_str())))
        .and_opt(filters.min_age.map(|v| Condition::gte(columns::AGE, v)))
        .and_opt(filters.max_age.map(|v| Condition::lte(columns::AGE, v)))
        .and_opt(Condition::in_set(columns::RELIGION, &filters.religion))
        .and_opt(Condition::in_set(columns::CAST, &filters.cast))
        .and_opt(Condition::in_set(columns::CITY, &filters.city))
        .and_opt(Condition::in_set(columns::STATE, &filters.state))
        .and_opt(Condition::in_set(columns::COUNTRY, &filters.country))
        .and_opt(Condition::in_set(columns::EDUCATION, &filters.education))
        .and_opt(filters.min_income.map(|v| Condition::gte(columns::ANNUAL_INCOME, v)))
        .and_opt(filters.max_income.map(|v| Condition::lte(columns::ANNUAL_INCOME, v)))
        .and_opt(Condition::in_set(columns::MARITAL_STATUS, &filters.marital_status))
        .and_opt(filters.smoking.map(|h| Condition::eq(columns::SMOKING, h.as_str())))
        .and_opt(filters.drinking.map(|h| Condition::eq(columns::DRINKING, h.as_str())))
        .and_opt(filters.verified.then(|| Condition::is_true(columns::IS_VERIFIED)))
        .and_opt(filters.featured.then(|| Condition::is_true(columns::IS_FEATURED)))
        .and_opt(
            filters
                .search
                .as_deref()
                .and_then(|term| Condition::contains_any(&[columns::FULL_NAME, columns::ABOUT_ME], term)),
        )
        .build()
}

fn structural_predicate(exclude_user_id: Option<u64>) -> Predicate {
    Predicate::new()
        .and(Condition::is_true(columns::PROFILE_COMPLETED))
        .and(Condition::is_true(columns::USER_ACTIVE))
        .and_opt(exclude_user_id.map(|id| Condition::not_eq(columns::USER_ID, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::predicate::SqlValue;
    use crate::models::{Gender, Habit};

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_empty_filters_keep_structural_conditions() {
        let clause = build_search_predicate(&FilterSpecification::default(), None);
        assert_eq!(
            clause.sql,
            "WHERE p.profile_completed = TRUE AND u.is_active = TRUE"
        );
        assert!(clause.params.is_empty());
    }

    #[test]
    fn test_self_exclusion_precedes_filters() {
        let filters = FilterSpecification {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, Some(7));

        assert_eq!(
            clause.sql,
            "WHERE p.profile_completed = TRUE AND u.is_active = TRUE \
             AND p.user_id <> ? AND p.gender = ?"
        );
        assert_eq!(
            clause.params,
            vec![SqlValue::UInt(7), SqlValue::Text("male".into())]
        );
    }

    #[test]
    fn test_ranges_are_independent() {
        let filters = FilterSpecification {
            max_age: Some(40),
            min_income: Some(500_000),
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, None);

        assert!(clause.sql.contains("p.age <= ?"));
        assert!(!clause.sql.contains("p.age >= ?"));
        assert!(clause.sql.contains("p.annual_income >= ?"));
        assert!(!clause.sql.contains("p.annual_income <= ?"));
        assert_eq!(clause.params, vec![SqlValue::Int(40), SqlValue::Int(500_000)]);
    }

    #[test]
    fn test_set_fields_or_within_and_across() {
        let filters = FilterSpecification {
            religion: vec!["A".into(), "B".into()],
            city: vec!["X".into()],
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, None);

        assert!(clause.sql.contains("p.religion IN (?, ?) AND p.city IN (?)"));
        assert_eq!(
            clause.params,
            vec![
                SqlValue::Text("A".into()),
                SqlValue::Text("B".into()),
                SqlValue::Text("X".into()),
            ]
        );
    }

    #[test]
    fn test_empty_set_field_is_dropped() {
        let filters = FilterSpecification {
            religion: vec![],
            marital_status: vec!["".into(), "   ".into()],
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, None);

        assert!(!clause.sql.contains("religion"));
        assert!(!clause.sql.contains("marital_status"));
        assert!(!clause.sql.contains("IN ()"));
    }

    #[test]
    fn test_placeholders_match_params_for_every_field() {
        let filters = FilterSpecification {
            gender: Some(Gender::Female),
            min_age: Some(21),
            max_age: Some(30),
            religion: vec!["Hindu".into(), "Jain".into()],
            cast: vec!["Iyer".into()],
            city: vec!["Chennai".into(), "Madurai".into(), "Salem".into()],
            state: vec!["Tamil Nadu".into()],
            country: vec!["India".into()],
            education: vec!["MBA".into()],
            min_income: Some(1),
            max_income: Some(2),
            marital_status: vec!["never_married".into()],
            smoking: Some(Habit::Never),
            drinking: Some(Habit::Occasionally),
            verified: true,
            featured: true,
            search: Some("doctor?".into()),
        };
        let clause = build_search_predicate(&filters, Some(3));

        assert_eq!(placeholders(&clause.sql), clause.params.len());
        assert_eq!(clause.params.first(), Some(&SqlValue::UInt(3)));
        assert_eq!(
            clause.params.last(),
            Some(&SqlValue::Text("%doctor?%".into()))
        );
    }

    #[test]
    fn test_habit_filters_bind_stored_values() {
        let filters: FilterSpecification =
            serde_json::from_value(serde_json::json!({ "smoking": "regularly", "drinking": "no" }))
                .unwrap();
        let clause = build_search_predicate(&filters, None);

        assert!(clause.sql.contains("p.smoking = ? AND p.drinking = ?"));
        assert_eq!(
            clause.params,
            vec![
                SqlValue::Text("regularly".into()),
                SqlValue::Text("never".into()),
            ]
        );
    }

    #[test]
    fn test_flags_only_when_requested() {
        let clause = build_search_predicate(&FilterSpecification::default(), None);
        assert!(!clause.sql.contains("is_verified"));
        assert!(!clause.sql.contains("is_featured"));

        let filters = FilterSpecification {
            verified: true,
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, None);
        assert!(clause.sql.ends_with("p.is_verified = TRUE"));
    }

    #[test]
    fn test_blank_search_term_adds_nothing() {
        let filters = FilterSpecification {
            search: Some("   ".into()),
            ..Default::default()
        };
        let clause = build_search_predicate(&filters, None);
        assert!(!clause.sql.contains("LIKE"));
    }
}
