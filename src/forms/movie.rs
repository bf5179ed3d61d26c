use crate::models;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use uuid::Uuid;

/// Membership lists supplied with a movie write. `None` leaves the stored
/// membership untouched; `Some` replaces it.
#[derive(Debug, Default, Clone)]
pub struct MovieRelations {
    pub genre_ids: Option<Vec<Uuid>>,
    pub production_company_ids: Option<Vec<Uuid>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Full movie payload used by create and replace.
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct MovieForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    pub title: String,
    #[serde(default)]
    #[validate(max_length = 200)]
    pub original_title: String,
    pub release_date: Option<NaiveDate>,
    #[validate(minimum = 1)]
    pub runtime: Option<i32>,
    #[validate(minimum = 0)]
    pub budget: Option<i64>,
    #[validate(minimum = 0)]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    #[validate(max_length = 500)]
    pub tagline: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub backdrop_url: String,
    #[serde(default)]
    pub trailer_url: String,
    #[validate(max_length = 20)]
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
    #[serde(default)]
    pub status: models::MovieStatus,
    #[serde(default)]
    pub adult: bool,
    #[validate(minimum = 0.0)]
    pub popularity_score: Option<f64>,
    #[validate(minimum = 0.0)]
    #[validate(maximum = 10.0)]
    pub vote_average: Option<f64>,
    #[validate(minimum = 0)]
    pub vote_count: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    pub genre_ids: Option<Vec<Uuid>>,
    pub production_company_ids: Option<Vec<Uuid>>,
}

impl MovieForm {
    /// Overwrites every column of `movie` and hands back the membership lists.
    pub fn update(self, movie: &mut models::Movie) -> MovieRelations {
        movie.title = self.title;
        movie.original_title = self.original_title;
        movie.release_date = self.release_date;
        movie.runtime = self.runtime;
        movie.budget = self.budget;
        movie.revenue = self.revenue;
        movie.overview = self.overview;
        movie.tagline = self.tagline;
        movie.poster_url = self.poster_url;
        movie.backdrop_url = self.backdrop_url;
        movie.trailer_url = self.trailer_url;
        movie.imdb_id = non_empty(self.imdb_id);
        movie.tmdb_id = self.tmdb_id;
        movie.status = self.status;
        movie.adult = self.adult;
        movie.popularity_score = self.popularity_score;
        movie.vote_average = self.vote_average;
        movie.vote_count = self.vote_count;
        movie.is_featured = self.is_featured;
        movie.updated_at = Utc::now();

        MovieRelations {
            genre_ids: self.genre_ids,
            production_company_ids: self.production_company_ids,
        }
    }

    pub fn into_model(self) -> (models::Movie, MovieRelations) {
        let mut movie = models::Movie::new(String::new());
        let relations = self.update(&mut movie);
        (movie, relations)
    }
}

/// Partial movie payload; absent fields keep their stored value.
#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct MoviePatch {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    pub title: Option<String>,
    #[validate(max_length = 200)]
    pub original_title: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(minimum = 1)]
    pub runtime: Option<i32>,
    #[validate(minimum = 0)]
    pub budget: Option<i64>,
    #[validate(minimum = 0)]
    pub revenue: Option<i64>,
    pub overview: Option<String>,
    #[validate(max_length = 500)]
    pub tagline: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    #[validate(max_length = 20)]
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
    pub status: Option<models::MovieStatus>,
    pub adult: Option<bool>,
    #[validate(minimum = 0.0)]
    pub popularity_score: Option<f64>,
    #[validate(minimum = 0.0)]
    #[validate(maximum = 10.0)]
    pub vote_average: Option<f64>,
    #[validate(minimum = 0)]
    pub vote_count: Option<i32>,
    pub is_featured: Option<bool>,
    pub genre_ids: Option<Vec<Uuid>>,
    pub production_company_ids: Option<Vec<Uuid>>,
}

impl MoviePatch {
    pub fn update(self, movie: &mut models::Movie) -> MovieRelations {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(original_title) = self.original_title {
            movie.original_title = original_title;
        }
        if self.release_date.is_some() {
            movie.release_date = self.release_date;
        }
        if self.runtime.is_some() {
            movie.runtime = self.runtime;
        }
        if self.budget.is_some() {
            movie.budget = self.budget;
        }
        if self.revenue.is_some() {
            movie.revenue = self.revenue;
        }
        if let Some(overview) = self.overview {
            movie.overview = overview;
        }
        if let Some(tagline) = self.tagline {
            movie.tagline = tagline;
        }
        if let Some(poster_url) = self.poster_url {
            movie.poster_url = poster_url;
        }
        if let Some(backdrop_url) = self.backdrop_url {
            movie.backdrop_url = backdrop_url;
        }
        if let Some(trailer_url) = self.trailer_url {
            movie.trailer_url = trailer_url;
        }
        if self.imdb_id.is_some() {
            movie.imdb_id = non_empty(self.imdb_id);
        }
        if self.tmdb_id.is_some() {
            movie.tmdb_id = self.tmdb_id;
        }
        if let Some(status) = self.status {
            movie.status = status;
        }
        if let Some(adult) = self.adult {
            movie.adult = adult;
        }
        if self.popularity_score.is_some() {
            movie.popularity_score = self.popularity_score;
        }
        if self.vote_average.is_some() {
            movie.vote_average = self.vote_average;
        }
        if self.vote_count.is_some() {
            movie.vote_count = self.vote_count;
        }
        if let Some(is_featured) = self.is_featured {
            movie.is_featured = is_featured;
        }
        movie.updated_at = Utc::now();

        MovieRelations {
            genre_ids: self.genre_ids,
            production_company_ids: self.production_company_ids,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MovieFilter {
    pub search: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub genre: Option<String>,
    pub genre_id: Option<Uuid>,
    pub year: Option<i32>,
    pub year_gte: Option<i32>,
    pub year_lte: Option<i32>,
    pub status: Option<models::MovieStatus>,
    pub rating_gte: Option<f64>,
    pub rating_lte: Option<f64>,
    pub popularity_gte: Option<f64>,
    pub popularity_lte: Option<f64>,
    pub featured: Option<bool>,
    pub adult: Option<bool>,
    pub production_company: Option<String>,
    pub production_company_id: Option<Uuid>,
    pub runtime_gte: Option<i32>,
    pub runtime_lte: Option<i32>,
    pub release_date_gte: Option<NaiveDate>,
    pub release_date_lte: Option<NaiveDate>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub include_tmdb: Option<bool>,
    pub sync_missing: Option<bool>,
}

impl SearchQuery {
    /// Trimmed query text, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// The remote-backed search runs only when both flags hold; both default to true.
    pub fn wants_remote(&self) -> bool {
        self.include_tmdb.unwrap_or(true) && self.sync_missing.unwrap_or(true)
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SyncRequest {
    #[validate(minimum = 1)]
    pub tmdb_id: Option<i32>,
}
