use super::catalog::{Company, Genre, Person};
use crate::models;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Movie as it appears in listings and search results.
#[derive(Debug, Serialize)]
pub struct MovieListItem {
    pub id: Uuid,
    pub title: String,
    pub original_title: String,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub runtime: Option<i32>,
    pub overview: String,
    pub tagline: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub trailer_url: String,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
    pub status: models::MovieStatus,
    pub adult: bool,
    pub popularity_score: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<Company>,
}

impl MovieListItem {
    pub fn new(
        movie: models::Movie,
        genres: Vec<models::Genre>,
        companies: Vec<models::ProductionCompany>,
    ) -> Self {
        Self {
            release_year: movie.release_year(),
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            release_date: movie.release_date,
            runtime: movie.runtime,
            overview: movie.overview,
            tagline: movie.tagline,
            poster_url: movie.poster_url,
            backdrop_url: movie.backdrop_url,
            trailer_url: movie.trailer_url,
            imdb_id: movie.imdb_id,
            tmdb_id: movie.tmdb_id,
            status: movie.status,
            adult: movie.adult,
            popularity_score: movie.popularity_score,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            is_featured: movie.is_featured,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
            genres: genres.into_iter().map(Genre::from).collect(),
            production_companies: companies.into_iter().map(Company::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CastEntry {
    pub id: Uuid,
    pub person: Person,
    pub character_name: String,
    pub cast_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<models::CastMember> for CastEntry {
    fn from(member: models::CastMember) -> Self {
        Self {
            id: member.credit_id,
            person: member.person.into(),
            character_name: member.character_name,
            cast_order: member.cast_order,
            created_at: member.credited_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CrewEntry {
    pub id: Uuid,
    pub person: Person,
    pub job: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl From<models::CrewMember> for CrewEntry {
    fn from(member: models::CrewMember) -> Self {
        Self {
            id: member.credit_id,
            person: member.person.into(),
            job: member.job,
            department: member.department,
            created_at: member.credited_at,
        }
    }
}

/// Full movie page: list fields plus money, credits, director and genre names.
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: MovieListItem,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub cast: Vec<CastEntry>,
    pub crew: Vec<CrewEntry>,
    pub director: Option<Person>,
    pub genre_list: Vec<String>,
}

impl MovieDetail {
    pub fn new(
        movie: models::Movie,
        genres: Vec<models::Genre>,
        companies: Vec<models::ProductionCompany>,
        cast: Vec<models::CastMember>,
        crew: Vec<models::CrewMember>,
    ) -> Self {
        let budget = movie.budget;
        let revenue = movie.revenue;
        let genre_list = genres.iter().map(|genre| genre.name.clone()).collect();
        let director = crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| Person::from(member.person.clone()));

        Self {
            movie: MovieListItem::new(movie, genres, companies),
            budget,
            revenue,
            cast: cast.into_iter().map(CastEntry::from).collect(),
            crew: crew.into_iter().map(CrewEntry::from).collect(),
            director,
            genre_list,
        }
    }
}

#[derive(Debug, Serialize, Default, PartialEq)]
pub struct SearchStats {
    pub local_count: usize,
    pub tmdb_count: usize,
    pub synced_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<MovieListItem>,
    pub search_stats: SearchStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn crew_member(name: &str, job: &str) -> models::CrewMember {
        models::CrewMember {
            credit_id: Uuid::new_v4(),
            job: job.to_string(),
            department: "Directing".to_string(),
            credited_at: Utc::now(),
            person: models::Person::new(name.to_string()),
        }
    }

    #[test]
    fn detail_derives_director_and_genre_names() {
        let mut movie = models::Movie::new("Heat".to_string());
        movie.release_date = NaiveDate::from_ymd_opt(1995, 12, 15);
        movie.budget = Some(60_000_000);

        let genres = vec![
            models::Genre::new("Crime".to_string(), String::new()),
            models::Genre::new("Drama".to_string(), String::new()),
        ];
        let crew = vec![
            crew_member("Art Linson", "Producer"),
            crew_member("Michael Mann", "Director"),
        ];

        let detail = MovieDetail::new(movie, genres, vec![], vec![], crew);

        assert_eq!(detail.movie.release_year, Some(1995));
        assert_eq!(detail.genre_list, vec!["Crime", "Drama"]);
        assert_eq!(detail.director.map(|p| p.name), Some("Michael Mann".to_string()));

        let value = serde_json::to_value(
            MovieDetail::new(models::Movie::new("x".to_string()), vec![], vec![], vec![], vec![]),
        )
        .unwrap();
        assert!(value.get("title").is_some());
        assert!(value["director"].is_null());
    }
}
