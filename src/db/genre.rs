use super::{like_pattern, non_blank, WriteError};
use crate::forms::{GenreFilter, ListParams};
use crate::models;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::Instrument;
use uuid::Uuid;

pub const ORDERING_FIELDS: &[&str] = &["name", "created_at"];
pub const DEFAULT_ORDERING: &str = "name";

const WITH_COUNT: &str = "SELECT g.*, \
     (SELECT COUNT(*) FROM movie_genres mg WHERE mg.genre_id = g.id) AS movie_count \
     FROM genres g";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &GenreFilter) {
    builder.push(" WHERE TRUE");
    if let Some(search) = non_blank(&filter.search) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (g.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR g.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(name) = non_blank(&filter.name) {
        builder.push(" AND g.name ILIKE ").push_bind(like_pattern(name));
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &GenreFilter,
    params: &ListParams,
) -> Result<(Vec<models::GenreWithCount>, i64), String> {
    let query_span = tracing::info_span!("Fetch genres.");

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM genres g");
    push_filters(&mut count_query, filter);
    let count: i64 = count_query
        .build_query_scalar()
        .fetch_one(pool)
        .instrument(query_span.clone())
        .await
        .map_err(|err| {
            tracing::error!("Failed to count genres, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    let mut query = QueryBuilder::<Postgres>::new(WITH_COUNT);
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY ")
        .push(params.order_by(ORDERING_FIELDS, DEFAULT_ORDERING).to_sql("g"))
        .push(" LIMIT ")
        .push_bind(params.page_size())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let genres = query
        .build_query_as::<models::GenreWithCount>()
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch genres, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    Ok((genres, count))
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::Genre>, String> {
    let query_span = tracing::info_span!("Fetch genre by id.");
    sqlx::query_as::<_, models::Genre>("SELECT * FROM genres WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch genre, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

/// Movies tagged with the genre, newest first.
pub async fn movies_of(pool: &PgPool, genre_id: Uuid) -> Result<Vec<models::MovieBrief>, String> {
    let query_span = tracing::info_span!("Fetch movies of genre.");
    sqlx::query_as::<_, models::MovieBrief>(
        r#"
        SELECT m.id, m.title, m.release_date, m.poster_url, m.vote_average, m.popularity_score
        FROM movie_genres mg
        JOIN movies m ON m.id = mg.movie_id
        WHERE mg.genre_id = $1
        ORDER BY m.created_at DESC, m.id
        "#,
    )
    .bind(genre_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch movies of genre, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// Genres of every movie in `movie_ids`, ordered by name.
pub async fn for_movies(pool: &PgPool, movie_ids: &[Uuid]) -> Result<Vec<models::MovieGenreLink>, String> {
    let query_span = tracing::info_span!("Fetch genres of movies.");
    sqlx::query_as::<_, models::MovieGenreLink>(
        r#"
        SELECT mg.movie_id, g.id, g.name, g.description, g.created_at
        FROM movie_genres mg
        JOIN genres g ON g.id = mg.genre_id
        WHERE mg.movie_id = ANY($1)
        ORDER BY g.name
        "#,
    )
    .bind(movie_ids)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch movie genres, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn insert(pool: &PgPool, genre: models::Genre) -> Result<models::Genre, WriteError> {
    let query_span = tracing::info_span!("Saving genre into the database");
    sqlx::query("INSERT INTO genres (id, name, description, created_at) VALUES ($1, $2, $3, $4)")
        .bind(genre.id)
        .bind(&genre.name)
        .bind(&genre.description)
        .bind(genre.created_at)
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| genre)
        .map_err(|err| WriteError::from_sqlx(err, "genre"))
}

pub async fn update(pool: &PgPool, genre: models::Genre) -> Result<models::Genre, WriteError> {
    let query_span = tracing::info_span!("Updating genre");
    sqlx::query("UPDATE genres SET name = $2, description = $3 WHERE id = $1")
        .bind(genre.id)
        .bind(&genre.name)
        .bind(&genre.description)
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| genre)
        .map_err(|err| WriteError::from_sqlx(err, "genre"))
}

/// Removes the genre and its movie links. Returns false when absent.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, String> {
    let query_span = tracing::info_span!("Delete genre.", %id);

    async {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM movie_genres WHERE genre_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        Ok::<bool, sqlx::Error>(deleted > 0)
    }
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to delete genre, error: {:?}", err);
        "Failed to delete".to_string()
    })
}

pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> Result<Option<models::Genre>, sqlx::Error> {
    sqlx::query_as::<_, models::Genre>("SELECT * FROM genres WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

/// Inserts unless a genre with the same name exists. Returns whether a row was written.
pub async fn insert_if_absent(conn: &mut PgConnection, genre: &models::Genre) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO genres (id, name, description, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ON CONSTRAINT genres_name_key DO NOTHING
        "#,
    )
    .bind(genre.id)
    .bind(&genre.name)
    .bind(&genre.description)
    .bind(genre.created_at)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}

/// Links a movie to a genre if that genre exists; duplicates are ignored.
pub async fn link_existing(conn: &mut PgConnection, movie_id: Uuid, genre_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO movie_genres (id, movie_id, genre_id, created_at)
        SELECT $1, $2, g.id, NOW() FROM genres g WHERE g.id = $3
        ON CONFLICT ON CONSTRAINT movie_genres_movie_genre_key DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(movie_id)
    .bind(genre_id)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}
