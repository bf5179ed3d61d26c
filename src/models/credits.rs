//! Join entities linking movies to genres, companies and people.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieGenre {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub genre_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieProductionCompany {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub company_id: Uuid,
}

/// One billed cast member; unique per (movie, person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieCast {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub person_id: Uuid,
    pub character_name: String,
    pub cast_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// One crew credit; a person may hold several distinct jobs on a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieCrew {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub person_id: Uuid,
    pub job: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

/// Cast credit joined with its person, as shown on a movie page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CastMember {
    pub credit_id: Uuid,
    pub character_name: String,
    pub cast_order: Option<i32>,
    pub credited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub person: super::Person,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CrewMember {
    pub credit_id: Uuid,
    pub job: String,
    pub department: String,
    pub credited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub person: super::Person,
}

/// Minimal movie columns used inside filmographies and genre/company pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieBrief {
    pub id: Uuid,
    pub title: String,
    pub release_date: Option<chrono::NaiveDate>,
    pub poster_url: String,
    pub vote_average: Option<f64>,
    pub popularity_score: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CastRole {
    pub character_name: String,
    pub cast_order: Option<i32>,
    #[sqlx(flatten)]
    pub movie: MovieBrief,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CrewRole {
    pub job: String,
    pub department: String,
    #[sqlx(flatten)]
    pub movie: MovieBrief,
}
