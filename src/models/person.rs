use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub biography: String,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    pub place_of_birth: String,
    pub profile_image_url: String,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            biography: String::new(),
            birthday: None,
            deathday: None,
            place_of_birth: String::new(),
            profile_image_url: String::new(),
            imdb_id: None,
            tmdb_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
