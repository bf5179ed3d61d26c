//! Import of a TMDB movie together with its genres, companies, cast and crew.
//!
//! The remote record is first turned into a [`MoviePlan`] (pure mapping, no
//! I/O), then written in a single transaction. Nothing of a failed attempt is
//! left behind. Text fields are cut to their column widths while planning.

use crate::connectors::{CompanyRecord, ConnectorError, GenreRecord, ImageSize, ImageUrlBuilder, MovieRecord, TmdbConnector};
use crate::db;
use crate::models::{self, MovieStatus};
use crate::services::resolver::{self, clip, COMPANY_NAME_LEN, GENRE_NAME_LEN, PERSON_NAME_LEN};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use std::collections::{BTreeMap, HashMap};

/// Billed cast members kept per movie.
pub const MAX_CAST: usize = 20;

/// Crew jobs worth keeping; everything else is dropped.
pub const CREW_JOBS: &[&str] = &[
    "Director",
    "Producer",
    "Executive Producer",
    "Screenplay",
    "Writer",
    "Director of Photography",
    "Original Music Composer",
    "Editor",
];

const TITLE_LEN: usize = 200;
const TAGLINE_LEN: usize = 500;
const IMDB_ID_LEN: usize = 20;
const CHARACTER_NAME_LEN: usize = 200;
const JOB_LEN: usize = 100;
const DEPARTMENT_LEN: usize = 50;
const MOVIE_TMDB_ID_KEY: &str = "movies_tmdb_id_key";

#[derive(Debug)]
pub enum SyncOutcome {
    Created(models::Movie),
    /// The movie was already in the catalog; nothing was written.
    AlreadyExists(models::Movie),
}

impl SyncOutcome {
    pub fn movie(&self) -> &models::Movie {
        match self {
            SyncOutcome::Created(movie) | SyncOutcome::AlreadyExists(movie) => movie,
        }
    }

    pub fn into_movie(self) -> models::Movie {
        match self {
            SyncOutcome::Created(movie) | SyncOutcome::AlreadyExists(movie) => movie,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SyncOutcome::Created(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("remote metadata unavailable: {0}")]
    Unavailable(#[from] ConnectorError),
    /// The cause is logged where it happens; the message is safe to show.
    #[error("{0}")]
    Failed(String),
}

/// Accepts `YYYY-MM-DD` only. Anything else means "no release date".
pub fn parse_release_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        tracing::warn!("Release date missing, storing none");
        return None;
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!("Failed to parse release date: {}", value);
            None
        }
    }
}

/// Unknown or missing statuses fall back to `released`.
pub fn map_status(status: Option<&str>) -> MovieStatus {
    match status.map(str::trim) {
        Some("Released") | Some("Canceled") => MovieStatus::Released,
        Some("Post Production") | Some("Planned") | Some("Rumored") => MovieStatus::Upcoming,
        Some("In Production") => MovieStatus::InProduction,
        Some(other) => {
            tracing::debug!("Unrecognised TMDB status {:?}, using released", other);
            MovieStatus::Released
        }
        None => MovieStatus::Released,
    }
}

/// Zero from TMDB means "unknown" for runtime, budget and revenue.
fn positive<T: PartialOrd + Default>(value: Option<T>) -> Option<T> {
    value.filter(|value| *value > T::default())
}

fn is_kept_job(job: &str) -> bool {
    CREW_JOBS.contains(&job)
}

/// Person credited on the movie; cast and crew entries refer to it by `tmdb_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonPlan {
    pub tmdb_id: i32,
    pub name: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastPlan {
    pub tmdb_id: i32,
    pub character_name: String,
    pub cast_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrewPlan {
    pub tmdb_id: i32,
    pub job: String,
    pub department: String,
}

/// Everything that will be written for one remote movie.
///
/// Genres and companies are unique and sorted by name, people unique and
/// sorted by TMDB id. Writers resolve them in that order.
#[derive(Debug, Clone)]
pub struct MoviePlan {
    pub movie: models::Movie,
    pub genres: Vec<GenreRecord>,
    pub companies: Vec<CompanyRecord>,
    pub people: Vec<PersonPlan>,
    pub cast: Vec<CastPlan>,
    pub crew: Vec<CrewPlan>,
}

impl MoviePlan {
    pub fn from_record(record: MovieRecord, images: &ImageUrlBuilder) -> Self {
        let mut movie = models::Movie::new(clip(&record.title, TITLE_LEN));
        movie.original_title = clip(&record.original_title, TITLE_LEN);
        movie.overview = record.overview.clone();
        movie.tagline = clip(&record.tagline, TAGLINE_LEN);
        movie.release_date = parse_release_date(record.release_date.as_deref());
        movie.runtime = positive(record.runtime);
        movie.budget = positive(record.budget);
        movie.revenue = positive(record.revenue);
        movie.status = map_status(record.status.as_deref());
        movie.adult = record.adult;
        movie.popularity_score = record.popularity;
        movie.vote_average = record.vote_average;
        movie.vote_count = record.vote_count;
        movie.poster_url = images.build_opt(record.poster_path.as_deref(), ImageSize::Poster);
        movie.backdrop_url = images.build_opt(record.backdrop_path.as_deref(), ImageSize::Backdrop);
        movie.trailer_url = record.trailer_url();
        movie.imdb_id = record.imdb_id().filter(|id| id.chars().count() <= IMDB_ID_LEN);
        movie.tmdb_id = Some(record.id);

        // first mention of a person wins, cast before crew
        let mut people: BTreeMap<i32, PersonPlan> = BTreeMap::new();

        let cast = record
            .credits
            .cast
            .into_iter()
            .take(MAX_CAST)
            .enumerate()
            .map(|(position, member)| {
                people.entry(member.id).or_insert_with(|| PersonPlan {
                    tmdb_id: member.id,
                    name: clip(&member.name, PERSON_NAME_LEN),
                    profile_path: member.profile_path.clone(),
                });
                CastPlan {
                    tmdb_id: member.id,
                    character_name: clip(&member.character, CHARACTER_NAME_LEN),
                    cast_order: member.order.unwrap_or(position as i32),
                }
            })
            .collect();

        let crew = record
            .credits
            .crew
            .into_iter()
            .filter(|member| is_kept_job(&member.job))
            .map(|member| {
                people.entry(member.id).or_insert_with(|| PersonPlan {
                    tmdb_id: member.id,
                    name: clip(&member.name, PERSON_NAME_LEN),
                    profile_path: member.profile_path.clone(),
                });
                CrewPlan {
                    tmdb_id: member.id,
                    job: clip(&member.job, JOB_LEN),
                    department: clip(&member.department, DEPARTMENT_LEN),
                }
            })
            .collect();

        let mut genres: Vec<GenreRecord> = record
            .genres
            .into_iter()
            .map(|genre| GenreRecord {
                name: clip(&genre.name, GENRE_NAME_LEN),
                ..genre
            })
            .filter(|genre| !genre.name.is_empty())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        genres.dedup_by(|a, b| a.name == b.name);

        let mut companies: Vec<CompanyRecord> = record
            .production_companies
            .into_iter()
            .map(|company| CompanyRecord {
                name: clip(&company.name, COMPANY_NAME_LEN),
                ..company
            })
            .filter(|company| !company.name.is_empty())
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        companies.dedup_by(|a, b| a.name == b.name);

        Self {
            movie,
            genres,
            companies,
            people: people.into_values().collect(),
            cast,
            crew,
        }
    }
}

/// Writes the movie row first, then resolves related entities in the plan's
/// order and links them.
async fn write_plan(
    conn: &mut PgConnection,
    images: &ImageUrlBuilder,
    plan: &MoviePlan,
) -> Result<(), sqlx::Error> {
    let movie_id = plan.movie.id;
    db::movie::insert_row(&mut *conn, &plan.movie).await?;

    for record in &plan.genres {
        let genre = resolver::resolve_genre(&mut *conn, record).await?;
        db::genre::link_existing(&mut *conn, movie_id, genre.id).await?;
    }

    for record in &plan.companies {
        let company = resolver::resolve_production_company(&mut *conn, images, record).await?;
        db::company::link_existing(&mut *conn, movie_id, company.id).await?;
    }

    let mut people = HashMap::with_capacity(plan.people.len());
    for member in &plan.people {
        let person = resolver::resolve_person(
            &mut *conn,
            images,
            member.tmdb_id,
            &member.name,
            member.profile_path.as_deref(),
        )
        .await?;
        people.insert(member.tmdb_id, person.id);
    }

    for member in &plan.cast {
        let person_id = people.get(&member.tmdb_id).ok_or(sqlx::Error::RowNotFound)?;
        db::credits::insert_cast(
            &mut *conn,
            movie_id,
            *person_id,
            &member.character_name,
            Some(member.cast_order),
        )
        .await?;
    }

    for member in &plan.crew {
        let person_id = people.get(&member.tmdb_id).ok_or(sqlx::Error::RowNotFound)?;
        db::credits::insert_crew(&mut *conn, movie_id, *person_id, &member.job, &member.department)
            .await?;
    }

    Ok(())
}

/// Fills in missing company logos. Takes its own connection, outside any
/// transaction.
async fn complete_companies(
    pool: &PgPool,
    tmdb: &dyn TmdbConnector,
    companies: &mut [CompanyRecord],
) -> Result<(), sqlx::Error> {
    if companies.iter().all(|company| company.logo_path.is_some()) {
        return Ok(());
    }

    let mut conn = pool.acquire().await?;
    for company in companies.iter_mut() {
        resolver::complete_company(&mut *conn, tmdb, company).await?;
    }
    Ok(())
}

fn is_duplicate_movie(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation() && db_err.constraint() == Some(MOVIE_TMDB_ID_KEY))
        .unwrap_or(false)
}

async fn existing_movie(pool: &PgPool, tmdb_id: i32) -> Result<Option<models::Movie>, SyncError> {
    db::movie::fetch_by_tmdb_id(pool, tmdb_id)
        .await
        .map_err(SyncError::Failed)
}

/// Imports the movie with TMDB id `tmdb_id` unless the catalog already has it.
#[tracing::instrument(name = "Sync movie from TMDB", skip(pool, tmdb))]
pub async fn sync_from_external_id(
    pool: &PgPool,
    tmdb: &dyn TmdbConnector,
    tmdb_id: i32,
) -> Result<SyncOutcome, SyncError> {
    if let Some(movie) = existing_movie(pool, tmdb_id).await? {
        tracing::info!(movie_id = %movie.id, "Movie already in catalog");
        return Ok(SyncOutcome::AlreadyExists(movie));
    }

    let record = tmdb.fetch_movie(tmdb_id).await.map_err(|err| {
        tracing::warn!(error = %err, "Could not fetch movie from TMDB");
        SyncError::from(err)
    })?;
    let mut plan = MoviePlan::from_record(record, tmdb.images());
    complete_companies(pool, tmdb, &mut plan.companies)
        .await
        .map_err(|err| {
            tracing::error!("Failed to look up production companies: {:?}", err);
            SyncError::Failed("Failed to sync movie".to_string())
        })?;

    let mut tx = pool.begin().await.map_err(|err| {
        tracing::error!("Failed to begin transaction: {:?}", err);
        SyncError::Failed("Failed to sync movie".to_string())
    })?;

    if let Err(err) = write_plan(&mut *tx, tmdb.images(), &plan).await {
        if let Err(rollback_err) = tx.rollback().await {
            tracing::warn!("Rollback failed: {:?}", rollback_err);
        }

        if is_duplicate_movie(&err) {
            // a concurrent sync committed the same movie first
            tracing::info!("Lost race to a concurrent sync");
            return existing_movie(pool, tmdb_id)
                .await?
                .map(SyncOutcome::AlreadyExists)
                .ok_or_else(|| SyncError::Failed("Failed to sync movie".to_string()));
        }

        tracing::error!("Failed to sync movie, rolled back: {:?}", err);
        return Err(SyncError::Failed("Failed to sync movie".to_string()));
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit synced movie: {:?}", err);
        SyncError::Failed("Failed to sync movie".to_string())
    })?;

    tracing::info!(
        title = %plan.movie.title,
        genres = plan.genres.len(),
        companies = plan.companies.len(),
        people = plan.people.len(),
        cast = plan.cast.len(),
        crew = plan.crew.len(),
        "Synced movie from TMDB"
    );

    // re-read so timestamps carry the stored precision
    let movie = db::movie::fetch(pool, plan.movie.id)
        .await
        .map_err(SyncError::Failed)?
        .unwrap_or(plan.movie);

    Ok(SyncOutcome::Created(movie))
}

/// Resolves every genre of the TMDB genre list.
#[tracing::instrument(name = "Sync genres from TMDB", skip(pool, tmdb))]
pub async fn sync_genres(pool: &PgPool, tmdb: &dyn TmdbConnector) -> Result<Vec<models::Genre>, SyncError> {
    let records = tmdb.fetch_genre_list().await.map_err(|err| {
        tracing::warn!(error = %err, "Could not fetch genre list from TMDB");
        SyncError::from(err)
    })?;

    let mut conn = pool.acquire().await.map_err(|err| {
        tracing::error!("Failed to acquire connection: {:?}", err);
        SyncError::Failed("Failed to sync genres".to_string())
    })?;

    let mut genres = Vec::with_capacity(records.len());
    for record in records.iter().filter(|record| !record.name.trim().is_empty()) {
        let genre = resolver::resolve_genre(&mut *conn, record).await.map_err(|err| {
            tracing::error!("Failed to resolve genre {}: {:?}", record.name, err);
            SyncError::Failed("Failed to sync genres".to_string())
        })?;
        genres.push(genre);
    }

    tracing::info!("Synced {} genres from TMDB", genres.len());
    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ImageSizes;
    use serde_json::json;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new("https://image.tmdb.org/t/p", ImageSizes::default())
    }

    fn record(value: serde_json::Value) -> MovieRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn outcome_exposes_the_movie() {
        let movie = models::Movie::new("Heat".to_string());
        let outcome = SyncOutcome::AlreadyExists(movie.clone());

        assert!(!outcome.is_created());
        assert_eq!(outcome.movie().id, movie.id);
        assert_eq!(outcome.into_movie(), movie);
    }

    #[test]
    fn release_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_release_date(Some("2020-03-05")),
            NaiveDate::from_ymd_opt(2020, 3, 5)
        );
        assert_eq!(parse_release_date(Some("2020")), None);
        assert_eq!(parse_release_date(Some("")), None);
        assert_eq!(parse_release_date(Some("05/03/2020")), None);
        assert_eq!(parse_release_date(None), None);
    }

    #[test]
    fn status_vocabulary_is_mapped() {
        assert_eq!(map_status(Some("Released")), MovieStatus::Released);
        assert_eq!(map_status(Some("Post Production")), MovieStatus::Upcoming);
        assert_eq!(map_status(Some("In Production")), MovieStatus::InProduction);
        assert_eq!(map_status(Some("Planned")), MovieStatus::Upcoming);
        assert_eq!(map_status(Some("Rumored")), MovieStatus::Upcoming);
        assert_eq!(map_status(Some("Canceled")), MovieStatus::Released);
        assert_eq!(map_status(Some("Weird Status")), MovieStatus::Released);
        assert_eq!(map_status(None), MovieStatus::Released);
    }

    #[test]
    fn zero_amounts_become_absent() {
        let plan = MoviePlan::from_record(
            record(json!({"id": 1, "title": "Free", "budget": 0, "revenue": 0, "runtime": 0})),
            &images(),
        );
        assert_eq!(plan.movie.budget, None);
        assert_eq!(plan.movie.revenue, None);
        assert_eq!(plan.movie.runtime, None);

        let plan = MoviePlan::from_record(
            record(json!({"id": 1, "title": "Paid", "budget": 63000000, "revenue": 463517383_i64, "runtime": 136})),
            &images(),
        );
        assert_eq!(plan.movie.budget, Some(63_000_000));
        assert_eq!(plan.movie.revenue, Some(463_517_383));
        assert_eq!(plan.movie.runtime, Some(136));
    }

    #[test]
    fn movie_fields_are_mapped() {
        let plan = MoviePlan::from_record(
            record(json!({
                "id": 603,
                "title": "The Matrix",
                "original_title": "The Matrix",
                "release_date": "1999-03-30",
                "status": "Released",
                "poster_path": "/p.jpg",
                "backdrop_path": "/b.jpg",
                "vote_average": 8.2,
                "vote_count": 25000,
                "popularity": 80.5,
                "external_ids": {"imdb_id": "tt0133093"},
                "videos": {"results": [{"key": "vKQi3bBA1y8", "site": "YouTube", "type": "Trailer"}]}
            })),
            &images(),
        );

        let movie = plan.movie;
        assert_eq!(movie.tmdb_id, Some(603));
        assert_eq!(movie.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(movie.release_year(), Some(1999));
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(movie.backdrop_url, "https://image.tmdb.org/t/p/w1280/b.jpg");
        assert_eq!(movie.trailer_url, "https://www.youtube.com/watch?v=vKQi3bBA1y8");
        assert_eq!(movie.status, MovieStatus::Released);
        assert_eq!(movie.vote_count, Some(25000));
    }

    #[test]
    fn cast_is_capped_at_twenty() {
        let cast: Vec<_> = (0..30)
            .map(|i| json!({"id": 1000 + i, "name": format!("Actor {i}"), "character": "Extra", "order": i}))
            .collect();
        let plan = MoviePlan::from_record(
            record(json!({"id": 1, "title": "Crowded", "credits": {"cast": cast, "crew": []}})),
            &images(),
        );

        assert_eq!(plan.cast.len(), MAX_CAST);
        let orders: Vec<i32> = plan.cast.iter().map(|member| member.cast_order).collect();
        assert_eq!(orders, (0..20).collect::<Vec<i32>>());
        assert_eq!(plan.cast[19].tmdb_id, 1019);
    }

    #[test]
    fn cast_order_falls_back_to_position() {
        let plan = MoviePlan::from_record(
            record(json!({"id": 1, "title": "x", "credits": {"cast": [
                {"id": 1, "name": "A", "character": "Neo", "order": 7},
                {"id": 2, "name": "B", "character": "Trinity"}
            ]}})),
            &images(),
        );

        assert_eq!(plan.cast[0].cast_order, 7);
        assert_eq!(plan.cast[1].cast_order, 1);
    }

    #[test]
    fn text_fields_are_cut_to_column_widths() {
        let long = "x".repeat(600);
        let plan = MoviePlan::from_record(
            record(json!({
                "id": 1,
                "title": long,
                "original_title": long,
                "tagline": long,
                "imdb_id": "tt0000001-not-an-imdb-id",
                "genres": [{"id": 28, "name": long}],
                "production_companies": [{"id": 2, "name": long, "origin_country": "USA"}],
                "credits": {
                    "cast": [{"id": 1, "name": long, "character": long}],
                    "crew": [{"id": 2, "name": long, "job": "Director", "department": long}]
                }
            })),
            &images(),
        );

        let width = |value: &str| value.chars().count();
        assert_eq!(width(&plan.movie.title), 200);
        assert_eq!(width(&plan.movie.original_title), 200);
        assert_eq!(width(&plan.movie.tagline), 500);
        assert_eq!(plan.movie.imdb_id, None);
        assert_eq!(width(&plan.genres[0].name), 50);
        assert_eq!(width(&plan.companies[0].name), 100);
        assert_eq!(width(&plan.people[0].name), 100);
        assert_eq!(width(&plan.people[1].name), 100);
        assert_eq!(width(&plan.cast[0].character_name), 200);
        assert_eq!(width(&plan.crew[0].department), 50);
    }

    #[test]
    fn related_entities_are_unique_and_sorted() {
        let plan = MoviePlan::from_record(
            record(json!({
                "id": 1,
                "title": "x",
                "genres": [{"id": 18, "name": "Drama"}, {"id": 28, "name": "Action"}, {"id": 18, "name": " Drama"}],
                "production_companies": [{"id": 2, "name": "Warner Bros."}, {"id": 1, "name": "Silver Pictures"}],
                "credits": {
                    "cast": [
                        {"id": 530, "name": "Carrie-Anne Moss", "character": "Trinity", "order": 0},
                        {"id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 1},
                        {"id": 530, "name": "Carrie-Anne Moss", "character": "Trinity (voice)", "order": 2}
                    ],
                    "crew": [
                        {"id": 9340, "name": "Lana Wachowski", "job": "Director", "department": "Directing"},
                        {"id": 9340, "name": "Lana Wachowski", "job": "Writer", "department": "Writing"},
                        {"id": 6384, "name": "K. Reeves", "job": "Producer", "department": "Production"}
                    ]
                }
            })),
            &images(),
        );

        let genres: Vec<&str> = plan.genres.iter().map(|genre| genre.name.as_str()).collect();
        assert_eq!(genres, vec!["Action", "Drama"]);
        let companies: Vec<&str> = plan.companies.iter().map(|company| company.name.as_str()).collect();
        assert_eq!(companies, vec!["Silver Pictures", "Warner Bros."]);

        let people: Vec<(i32, &str)> = plan
            .people
            .iter()
            .map(|person| (person.tmdb_id, person.name.as_str()))
            .collect();
        assert_eq!(
            people,
            vec![(530, "Carrie-Anne Moss"), (6384, "Keanu Reeves"), (9340, "Lana Wachowski")]
        );
        assert_eq!(plan.cast.len(), 3);
        assert_eq!(plan.crew.len(), 3);
    }

    #[test]
    fn crew_keeps_allowed_jobs_only() {
        let plan = MoviePlan::from_record(
            record(json!({"id": 1, "title": "x", "credits": {"cast": [], "crew": [
                {"id": 1, "name": "Lana", "job": "Director", "department": "Directing"},
                {"id": 2, "name": "Gus", "job": "Gaffer", "department": "Lighting"},
                {"id": 3, "name": "Lilly", "job": "Writer", "department": "Writing"}
            ]}})),
            &images(),
        );

        let jobs: Vec<&str> = plan.crew.iter().map(|member| member.job.as_str()).collect();
        assert_eq!(jobs, vec!["Director", "Writer"]);
    }

    #[test]
    fn blank_genres_and_companies_are_skipped() {
        let plan = MoviePlan::from_record(
            record(json!({
                "id": 1,
                "title": "x",
                "genres": [{"id": 28, "name": "Action"}, {"id": 0, "name": " "}],
                "production_companies": [{"id": 1, "name": ""}, {"id": 2, "name": "Village Roadshow"}]
            })),
            &images(),
        );

        assert_eq!(plan.genres.len(), 1);
        assert_eq!(plan.companies.len(), 1);
        assert_eq!(plan.companies[0].name, "Village Roadshow");
    }
}
