use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories recreated by a reset, in display order
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("tutorial", "Tutorial"),
    ("music", "Music"),
    ("entertainment", "Entertainment"),
    ("tech", "Technology"),
];

/// A user-defined video category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category whose slug is derived from its display name
    pub fn new(name: &str) -> Self {
        Self::with_slug(slugify(name), name.trim().to_string())
    }

    pub fn with_slug(slug: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Lower-cases the name and collapses each whitespace run into a single `-`
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
