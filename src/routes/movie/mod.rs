pub mod add;
pub mod delete;
pub mod get;
pub mod search;
pub mod sync;
pub mod update;

use crate::db;
use crate::models;
use crate::views;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Attaches genres and companies with one query each, whatever the page size.
pub(crate) async fn list_items(
    pool: &PgPool,
    movies: Vec<models::Movie>,
) -> Result<Vec<views::MovieListItem>, String> {
    if movies.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<Uuid> = movies.iter().map(|movie| movie.id).collect();

    let mut genres: HashMap<Uuid, Vec<models::Genre>> = HashMap::new();
    for link in db::genre::for_movies(pool, &ids).await? {
        genres.entry(link.movie_id).or_default().push(link.genre);
    }

    let mut companies: HashMap<Uuid, Vec<models::ProductionCompany>> = HashMap::new();
    for link in db::company::for_movies(pool, &ids).await? {
        companies.entry(link.movie_id).or_default().push(link.company);
    }

    Ok(movies
        .into_iter()
        .map(|movie| {
            let movie_genres = genres.remove(&movie.id).unwrap_or_default();
            let movie_companies = companies.remove(&movie.id).unwrap_or_default();
            views::MovieListItem::new(movie, movie_genres, movie_companies)
        })
        .collect())
}

pub(crate) async fn load_detail(pool: &PgPool, movie: models::Movie) -> Result<views::MovieDetail, String> {
    let ids = [movie.id];
    let genres = db::genre::for_movies(pool, &ids)
        .await?
        .into_iter()
        .map(|link| link.genre)
        .collect();
    let companies = db::company::for_movies(pool, &ids)
        .await?
        .into_iter()
        .map(|link| link.company)
        .collect();
    let cast = db::credits::cast_of(pool, movie.id).await?;
    let crew = db::credits::crew_of(pool, movie.id).await?;

    Ok(views::MovieDetail::new(movie, genres, companies, cast, crew))
}
