use serde::{Deserialize, Serialize};

/// Allow-listed result orderings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    AgeAsc,
    AgeDesc,
    Featured,
    MostViewed,
}

impl SortKey {
    /// Resolve an unchecked caller key; anything unrecognized is `Newest`
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_lowercase()).as_deref() {
            Some("oldest") => SortKey::Oldest,
            Some("age_asc") => SortKey::AgeAsc,
            Some("age_desc") => SortKey::AgeDesc,
            Some("featured") => SortKey::Featured,
            Some("most_viewed") => SortKey::MostViewed,
            _ => SortKey::Newest,
        }
    }

    /// Fixed `ORDER BY` expression for this key
    pub fn order_by(&self) -> &'static str {
        match self {
            SortKey::Newest => "p.created_at DESC",
            SortKey::Oldest => "p.created_at ASC",
            SortKey::AgeAsc => "p.age ASC",
            SortKey::AgeDesc => "p.age DESC",
            SortKey::Featured => "p.is_featured DESC, p.created_at DESC",
            SortKey::MostViewed => "p.view_count DESC",
        }
    }
}
