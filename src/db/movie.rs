use super::{like_pattern, non_blank, WriteError};
use crate::forms::{ListParams, MovieFilter, MovieRelations};
use crate::models;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::Instrument;
use uuid::Uuid;

pub const ORDERING_FIELDS: &[&str] = &[
    "title",
    "release_date",
    "popularity_score",
    "vote_average",
    "vote_count",
    "created_at",
    "runtime",
];
pub const DEFAULT_ORDERING: &str = "-created_at";

/// Fixed listings exposed next to the general movie list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Showcase {
    Featured,
    Popular,
    TopRated,
}

impl Showcase {
    fn condition(&self) -> &'static str {
        match self {
            Showcase::Featured => "m.is_featured",
            Showcase::Popular => "m.popularity_score IS NOT NULL",
            Showcase::TopRated => "m.vote_average IS NOT NULL AND m.vote_count >= 100",
        }
    }

    fn order(&self) -> &'static str {
        match self {
            Showcase::Featured => "m.created_at DESC, m.id",
            Showcase::Popular => "m.popularity_score DESC, m.created_at DESC, m.id",
            Showcase::TopRated => "m.vote_average DESC, m.vote_count DESC, m.id",
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &MovieFilter) {
    builder.push(" WHERE TRUE");

    if let Some(search) = non_blank(&filter.search) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (m.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.original_title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.overview ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.tagline ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(title) = non_blank(&filter.title) {
        builder.push(" AND m.title ILIKE ").push_bind(like_pattern(title));
    }
    if let Some(original_title) = non_blank(&filter.original_title) {
        builder
            .push(" AND m.original_title ILIKE ")
            .push_bind(like_pattern(original_title));
    }
    if let Some(genre) = non_blank(&filter.genre) {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
                 WHERE mg.movie_id = m.id AND g.name ILIKE ",
            )
            .push_bind(like_pattern(genre))
            .push(")");
    }
    if let Some(genre_id) = filter.genre_id {
        builder
            .push(" AND EXISTS (SELECT 1 FROM movie_genres mg WHERE mg.movie_id = m.id AND mg.genre_id = ")
            .push_bind(genre_id)
            .push(")");
    }
    if let Some(year) = filter.year {
        builder
            .push(" AND EXTRACT(YEAR FROM m.release_date)::int = ")
            .push_bind(year);
    }
    if let Some(year) = filter.year_gte {
        builder
            .push(" AND EXTRACT(YEAR FROM m.release_date)::int >= ")
            .push_bind(year);
    }
    if let Some(year) = filter.year_lte {
        builder
            .push(" AND EXTRACT(YEAR FROM m.release_date)::int <= ")
            .push_bind(year);
    }
    if let Some(status) = filter.status {
        builder.push(" AND m.status = ").push_bind(status);
    }
    if let Some(rating) = filter.rating_gte {
        builder.push(" AND m.vote_average >= ").push_bind(rating);
    }
    if let Some(rating) = filter.rating_lte {
        builder.push(" AND m.vote_average <= ").push_bind(rating);
    }
    if let Some(popularity) = filter.popularity_gte {
        builder.push(" AND m.popularity_score >= ").push_bind(popularity);
    }
    if let Some(popularity) = filter.popularity_lte {
        builder.push(" AND m.popularity_score <= ").push_bind(popularity);
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND m.is_featured = ").push_bind(featured);
    }
    if let Some(adult) = filter.adult {
        builder.push(" AND m.adult = ").push_bind(adult);
    }
    if let Some(company) = non_blank(&filter.production_company) {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM movie_production_companies mpc \
                 JOIN production_companies pc ON pc.id = mpc.company_id \
                 WHERE mpc.movie_id = m.id AND pc.name ILIKE ",
            )
            .push_bind(like_pattern(company))
            .push(")");
    }
    if let Some(company_id) = filter.production_company_id {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM movie_production_companies mpc \
                 WHERE mpc.movie_id = m.id AND mpc.company_id = ",
            )
            .push_bind(company_id)
            .push(")");
    }
    if let Some(runtime) = filter.runtime_gte {
        builder.push(" AND m.runtime >= ").push_bind(runtime);
    }
    if let Some(runtime) = filter.runtime_lte {
        builder.push(" AND m.runtime <= ").push_bind(runtime);
    }
    if let Some(date) = filter.release_date_gte {
        builder.push(" AND m.release_date >= ").push_bind(date);
    }
    if let Some(date) = filter.release_date_lte {
        builder.push(" AND m.release_date <= ").push_bind(date);
    }
    if let Some(imdb_id) = non_blank(&filter.imdb_id) {
        builder.push(" AND m.imdb_id = ").push_bind(imdb_id.to_string());
    }
    if let Some(tmdb_id) = filter.tmdb_id {
        builder.push(" AND m.tmdb_id = ").push_bind(tmdb_id);
    }
}

/// One page of movies matching `filter`, plus the total match count.
pub async fn list(
    pool: &PgPool,
    filter: &MovieFilter,
    params: &ListParams,
) -> Result<(Vec<models::Movie>, i64), String> {
    let query_span = tracing::info_span!("Fetch filtered movies.");

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movies m");
    push_filters(&mut count_query, filter);
    let count: i64 = count_query
        .build_query_scalar()
        .fetch_one(pool)
        .instrument(query_span.clone())
        .await
        .map_err(|err| {
            tracing::error!("Failed to count movies, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    let order = params.order_by(ORDERING_FIELDS, DEFAULT_ORDERING);
    let mut query = QueryBuilder::<Postgres>::new("SELECT m.* FROM movies m");
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY ")
        .push(order.to_sql("m"))
        .push(" LIMIT ")
        .push_bind(params.page_size())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let movies = query
        .build_query_as::<models::Movie>()
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch movies, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    Ok((movies, count))
}

pub async fn list_showcase(
    pool: &PgPool,
    showcase: Showcase,
    params: &ListParams,
) -> Result<(Vec<models::Movie>, i64), String> {
    let query_span = tracing::info_span!("Fetch showcase movies.", showcase = ?showcase);

    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM movies m WHERE {}",
        showcase.condition()
    ))
    .fetch_one(pool)
    .instrument(query_span.clone())
    .await
    .map_err(|err| {
        tracing::error!("Failed to count movies, error: {:?}", err);
        "Could not fetch data".to_string()
    })?;

    let movies = sqlx::query_as::<_, models::Movie>(&format!(
        "SELECT m.* FROM movies m WHERE {} ORDER BY {} LIMIT $1 OFFSET $2",
        showcase.condition(),
        showcase.order()
    ))
    .bind(params.page_size())
    .bind(params.offset())
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch movies, error: {:?}", err);
        "Could not fetch data".to_string()
    })?;

    Ok((movies, count))
}

/// Case-insensitive substring match over title, original title and overview.
pub async fn search_local(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<models::Movie>, String> {
    let query_span = tracing::info_span!("Search local movies.", query);
    let pattern = like_pattern(query.trim());

    sqlx::query_as::<_, models::Movie>(
        r#"
        SELECT m.* FROM movies m
        WHERE m.title ILIKE $1 OR m.original_title ILIKE $1 OR m.overview ILIKE $1
        ORDER BY m.created_at DESC, m.id
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to search movies, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::Movie>, String> {
    let query_span = tracing::info_span!("Fetch movie by id.");
    sqlx::query_as::<_, models::Movie>("SELECT * FROM movies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch movie, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn fetch_by_tmdb_id(pool: &PgPool, tmdb_id: i32) -> Result<Option<models::Movie>, String> {
    let query_span = tracing::info_span!("Fetch movie by tmdb id.", tmdb_id);
    sqlx::query_as::<_, models::Movie>("SELECT * FROM movies WHERE tmdb_id = $1")
        .bind(tmdb_id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch movie, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

/// Subset of `tmdb_ids` already present in the catalog.
pub async fn existing_tmdb_ids(pool: &PgPool, tmdb_ids: &[i32]) -> Result<Vec<i32>, String> {
    let query_span = tracing::info_span!("Fetch known tmdb ids.");
    sqlx::query_scalar::<_, i32>("SELECT tmdb_id FROM movies WHERE tmdb_id = ANY($1)")
        .bind(tmdb_ids)
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch tmdb ids, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn insert_row(conn: &mut PgConnection, movie: &models::Movie) -> Result<(), sqlx::Error> {
    let query_span = tracing::info_span!("Saving movie into the database", title = %movie.title);
    sqlx::query(
        r#"
        INSERT INTO movies (
            id, title, original_title, release_date, runtime, budget, revenue,
            overview, tagline, poster_url, backdrop_url, trailer_url, imdb_id, tmdb_id,
            status, adult, popularity_score, vote_average, vote_count, is_featured,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22)
        "#,
    )
    .bind(movie.id)
    .bind(&movie.title)
    .bind(&movie.original_title)
    .bind(movie.release_date)
    .bind(movie.runtime)
    .bind(movie.budget)
    .bind(movie.revenue)
    .bind(&movie.overview)
    .bind(&movie.tagline)
    .bind(&movie.poster_url)
    .bind(&movie.backdrop_url)
    .bind(&movie.trailer_url)
    .bind(&movie.imdb_id)
    .bind(movie.tmdb_id)
    .bind(movie.status)
    .bind(movie.adult)
    .bind(movie.popularity_score)
    .bind(movie.vote_average)
    .bind(movie.vote_count)
    .bind(movie.is_featured)
    .bind(movie.created_at)
    .bind(movie.updated_at)
    .execute(&mut *conn)
    .instrument(query_span)
    .await
    .map(|_| ())
}

async fn update_row(conn: &mut PgConnection, movie: &models::Movie) -> Result<bool, sqlx::Error> {
    let query_span = tracing::info_span!("Updating movie", id = %movie.id);
    sqlx::query(
        r#"
        UPDATE movies SET
            title = $2, original_title = $3, release_date = $4, runtime = $5,
            budget = $6, revenue = $7, overview = $8, tagline = $9, poster_url = $10,
            backdrop_url = $11, trailer_url = $12, imdb_id = $13, tmdb_id = $14,
            status = $15, adult = $16, popularity_score = $17, vote_average = $18,
            vote_count = $19, is_featured = $20, updated_at = $21
        WHERE id = $1
        "#,
    )
    .bind(movie.id)
    .bind(&movie.title)
    .bind(&movie.original_title)
    .bind(movie.release_date)
    .bind(movie.runtime)
    .bind(movie.budget)
    .bind(movie.revenue)
    .bind(&movie.overview)
    .bind(&movie.tagline)
    .bind(&movie.poster_url)
    .bind(&movie.backdrop_url)
    .bind(&movie.trailer_url)
    .bind(&movie.imdb_id)
    .bind(movie.tmdb_id)
    .bind(movie.status)
    .bind(movie.adult)
    .bind(movie.popularity_score)
    .bind(movie.vote_average)
    .bind(movie.vote_count)
    .bind(movie.is_featured)
    .bind(movie.updated_at)
    .execute(&mut *conn)
    .instrument(query_span)
    .await
    .map(|result| result.rows_affected() > 0)
}

/// Replaces genre and company membership for each list that is present.
/// Ids with no matching row are skipped.
async fn replace_relations(
    conn: &mut PgConnection,
    movie_id: Uuid,
    relations: &MovieRelations,
) -> Result<(), sqlx::Error> {
    if let Some(genre_ids) = &relations.genre_ids {
        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *conn)
            .await?;
        for genre_id in genre_ids {
            super::genre::link_existing(&mut *conn, movie_id, *genre_id).await?;
        }
    }

    if let Some(company_ids) = &relations.production_company_ids {
        sqlx::query("DELETE FROM movie_production_companies WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *conn)
            .await?;
        for company_id in company_ids {
            super::company::link_existing(&mut *conn, movie_id, *company_id).await?;
        }
    }

    Ok(())
}

pub async fn insert(
    pool: &PgPool,
    movie: models::Movie,
    relations: &MovieRelations,
) -> Result<models::Movie, WriteError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;

    insert_row(&mut tx, &movie)
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;
    replace_relations(&mut tx, movie.id, relations)
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie relations"))?;

    tx.commit()
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;

    Ok(movie)
}

/// Returns `Ok(None)` when the movie does not exist.
pub async fn update(
    pool: &PgPool,
    movie: models::Movie,
    relations: &MovieRelations,
) -> Result<Option<models::Movie>, WriteError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;

    let found = update_row(&mut tx, &movie)
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;
    if !found {
        return Ok(None);
    }

    replace_relations(&mut tx, movie.id, relations)
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie relations"))?;

    tx.commit()
        .await
        .map_err(|err| WriteError::from_sqlx(err, "movie"))?;

    Ok(Some(movie))
}

/// Deletes the movie and every join row that points at it. Returns false
/// when no such movie exists.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, String> {
    let query_span = tracing::info_span!("Delete movie with its join rows.", %id);

    async {
        let mut tx = pool.begin().await?;
        for statement in [
            "DELETE FROM movie_cast WHERE movie_id = $1",
            "DELETE FROM movie_crew WHERE movie_id = $1",
            "DELETE FROM movie_genres WHERE movie_id = $1",
            "DELETE FROM movie_production_companies WHERE movie_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut *tx).await?;
        }

        let deleted = sqlx::query("DELETE FROM movies WHERE id = $1")
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
        tracing::error!("Failed to delete movie, error: {:?}", err);
        "Failed to delete".to_string()
    })
}
