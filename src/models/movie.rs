use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[sqlx(type_name = "movie_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovieStatus {
    #[default]
    Released,
    Upcoming,
    InProduction,
}

impl MovieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Released => "released",
            MovieStatus::Upcoming => "upcoming",
            MovieStatus::InProduction => "in_production",
        }
    }
}

impl std::str::FromStr for MovieStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "released" => Ok(MovieStatus::Released),
            "upcoming" => Ok(MovieStatus::Upcoming),
            "in_production" => Ok(MovieStatus::InProduction),
            other => Err(format!("unknown movie status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub original_title: String,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>, // minutes
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub overview: String,
    pub tagline: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub trailer_url: String,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
    pub status: MovieStatus,
    pub adult: bool,
    pub popularity_score: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            original_title: String::new(),
            release_date: None,
            runtime: None,
            budget: None,
            revenue: None,
            overview: String::new(),
            tagline: String::new(),
            poster_url: String::new(),
            backdrop_url: String::new(),
            trailer_url: String::new(),
            imdb_id: None,
            tmdb_id: None,
            status: MovieStatus::Released,
            adult: false,
            popularity_score: None,
            vote_average: None,
            vote_count: None,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|date| date.year())
    }
}
