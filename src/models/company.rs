use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductionCompany {
    pub id: Uuid,
    pub name: String,
    pub logo_url: String,
    pub origin_country: String, // ISO 3166-1 alpha-2 or empty
    pub created_at: DateTime<Utc>,
}

impl ProductionCompany {
    pub fn new(name: String, logo_url: String, origin_country: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            logo_url,
            origin_country,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyWithCount {
    #[sqlx(flatten)]
    pub company: ProductionCompany,
    pub movie_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieCompanyLink {
    pub movie_id: Uuid,
    #[sqlx(flatten)]
    pub company: ProductionCompany,
}
