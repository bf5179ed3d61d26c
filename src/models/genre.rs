use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Genre {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenreWithCount {
    #[sqlx(flatten)]
    pub genre: Genre,
    pub movie_count: i64,
}

/// Genre attached to one movie of a batch.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieGenreLink {
    pub movie_id: Uuid,
    #[sqlx(flatten)]
    pub genre: Genre,
}
