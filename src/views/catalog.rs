use crate::models;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_count: Option<i64>,
}

impl From<models::Genre> for Genre {
    fn from(genre: models::Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
            description: genre.description,
            created_at: genre.created_at,
            movie_count: None,
        }
    }
}

impl From<models::GenreWithCount> for Genre {
    fn from(row: models::GenreWithCount) -> Self {
        Self {
            movie_count: Some(row.movie_count),
            ..Genre::from(row.genre)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreDetail {
    #[serde(flatten)]
    pub genre: Genre,
    pub movies: Vec<models::MovieBrief>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub logo_url: String,
    pub origin_country: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_count: Option<i64>,
}

impl From<models::ProductionCompany> for Company {
    fn from(company: models::ProductionCompany) -> Self {
        Self {
            id: company.id,
            name: company.name,
            logo_url: company.logo_url,
            origin_country: company.origin_country,
            created_at: company.created_at,
            movie_count: None,
        }
    }
}

impl From<models::CompanyWithCount> for Company {
    fn from(row: models::CompanyWithCount) -> Self {
        Self {
            movie_count: Some(row.movie_count),
            ..Company::from(row.company)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub movies: Vec<models::MovieBrief>,
}

#[derive(Debug, Serialize, Clone)]
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

impl From<models::Person> for Person {
    fn from(person: models::Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            biography: person.biography,
            birthday: person.birthday,
            deathday: person.deathday,
            place_of_birth: person.place_of_birth,
            profile_image_url: person.profile_image_url,
            imdb_id: person.imdb_id,
            tmdb_id: person.tmdb_id,
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CastRole {
    pub movie: models::MovieBrief,
    pub character_name: String,
    pub cast_order: Option<i32>,
}

impl From<models::CastRole> for CastRole {
    fn from(role: models::CastRole) -> Self {
        Self {
            movie: role.movie,
            character_name: role.character_name,
            cast_order: role.cast_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CrewRole {
    pub movie: models::MovieBrief,
    pub job: String,
    pub department: String,
}

impl From<models::CrewRole> for CrewRole {
    fn from(role: models::CrewRole) -> Self {
        Self {
            movie: role.movie,
            job: role.job,
            department: role.department,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: Person,
    pub cast_roles: Vec<CastRole>,
    pub crew_roles: Vec<CrewRole>,
}
