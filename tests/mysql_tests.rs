// Live MySQL tests; run with `DATABASE_URL=mysql://... cargo test -- --ignored`

use matrimony_search::core::{PaginationSettings, ProfileSearch, SortKey};
use matrimony_search::models::{FilterSpecification, Gender};
use matrimony_search::services::MySqlClient;
use sqlx::MySqlPool;
use std::sync::Arc;

const SCHEMA: &str = include_str!("fixtures/schema.sql");

async fn seed(pool: &MySqlPool) {
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let statement: String = statement
            .lines()
            .filter(|line| !line.trim_start().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        if !statement.trim().is_empty() {
            sqlx::query(&statement).execute(pool).await.unwrap();
        }
    }

    for table in ["profile_views", "subscriptions", "profiles", "users"] {
        sqlx::query(&format!("DELETE FROM {}", table)).execute(pool).await.unwrap();
    }

    // (user id, active, completed, gender, age, religion, city, verified)
    let fixtures: [(u64, bool, bool, &str, i32, &str, &str, bool); 7] = [
        (1, true, true, "female", 26, "Islam", "Hyderabad", true),
        (2, true, true, "female", 31, "Hindu", "Hyderabad", true),
        (3, true, true, "female", 29, "Christian", "Hyderabad", false),
        (4, true, true, "male", 30, "Islam", "Delhi", true),
        (5, false, true, "female", 27, "Islam", "Hyderabad", true),
        (6, true, false, "female", 28, "Islam", "Hyderabad", true),
        (7, true, true, "female", 27, "Islam", "Hyderabad", true),
    ];

    for (id, active, completed, gender, age, religion, city, verified) in fixtures {
        sqlx::query("INSERT INTO users (id, email, is_active) VALUES (?, ?, ?)")
            .bind(id)
            .bind(format!("user{}@example.com", id))
            .bind(active)
            .execute(pool)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO profiles (user_id, full_name, gender, age, religion, city, \
             is_verified, profile_completed, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW() - INTERVAL ? MINUTE)",
        )
        .bind(id)
        .bind(format!("User {}", id))
        .bind(gender)
        .bind(age)
        .bind(religion)
        .bind(city)
        .bind(verified)
        .bind(completed)
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires MySQL"]
async fn test_search_against_mysql() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = MySqlPool::connect(&url).await.expect("Failed to connect to MySQL");
    seed(&pool).await;

    let search = ProfileSearch::new(
        Arc::new(MySqlClient::from_pool(pool.clone())),
        PaginationSettings::default(),
    );

    // Empty filter: only complete profiles of active accounts
    let all = search
        .search(&FilterSpecification::default(), SortKey::Newest, None, None, None)
        .await
        .unwrap();
    let direct: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM profiles p INNER JOIN users u ON u.id = p.user_id \
         WHERE p.profile_completed = TRUE AND u.is_active = TRUE",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(all.pagination.total_items, direct as u64);
    assert_eq!(all.pagination.total_items, 5);
    assert_eq!(all.profiles.first().map(|p| p.user_id), Some(1));

    // Set semantics: religion in {Islam, Hindu} and city = Hyderabad
    let filters = FilterSpecification {
        religion: vec!["Islam".into(), "Hindu".into()],
        city: vec!["Hyderabad".into()],
        ..Default::default()
    };
    let result = search.search(&filters, SortKey::Newest, None, None, None).await.unwrap();
    let mut ids: Vec<u64> = result.profiles.iter().map(|p| p.user_id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 7]);

    // Empty religion set imposes nothing: the Christian profile is back
    let filters = FilterSpecification {
        religion: vec![],
        city: vec!["Hyderabad".into()],
        ..Default::default()
    };
    let result = search.search(&filters, SortKey::Newest, None, None, None).await.unwrap();
    assert!(result.profiles.iter().any(|p| p.religion.as_deref() == Some("Christian")));

    // Scenario with self-exclusion of user 7
    let filters = FilterSpecification {
        gender: Some(Gender::Female),
        min_age: Some(25),
        max_age: Some(32),
        religion: vec!["Islam".into()],
        verified: true,
        ..Default::default()
    };
    let result = search
        .search(&filters, SortKey::Newest, Some(1), Some(10), Some(7))
        .await
        .unwrap();
    let ids: Vec<u64> = result.profiles.iter().map(|p| p.user_id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(result.pagination.total_items, 1);
}
