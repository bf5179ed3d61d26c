use super::{like_pattern, non_blank, WriteError};
use crate::forms::{ListParams, PersonFilter};
use crate::models;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::Instrument;
use uuid::Uuid;

pub const ORDERING_FIELDS: &[&str] = &["name", "birthday", "created_at"];
pub const DEFAULT_ORDERING: &str = "name";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PersonFilter) {
    builder.push(" WHERE TRUE");
    if let Some(search) = non_blank(&filter.search) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.biography ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.place_of_birth ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(name) = non_blank(&filter.name) {
        builder.push(" AND p.name ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(place) = non_blank(&filter.place_of_birth) {
        builder
            .push(" AND p.place_of_birth ILIKE ")
            .push_bind(like_pattern(place));
    }
    if let Some(year) = filter.birth_year_gte {
        builder
            .push(" AND EXTRACT(YEAR FROM p.birthday)::int >= ")
            .push_bind(year);
    }
    if let Some(year) = filter.birth_year_lte {
        builder
            .push(" AND EXTRACT(YEAR FROM p.birthday)::int <= ")
            .push_bind(year);
    }
    match filter.is_alive {
        Some(true) => {
            builder.push(" AND p.deathday IS NULL");
        }
        Some(false) => {
            builder.push(" AND p.deathday IS NOT NULL");
        }
        None => {}
    }
    if let Some(imdb_id) = non_blank(&filter.imdb_id) {
        builder.push(" AND p.imdb_id = ").push_bind(imdb_id.to_string());
    }
    if let Some(tmdb_id) = filter.tmdb_id {
        builder.push(" AND p.tmdb_id = ").push_bind(tmdb_id);
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &PersonFilter,
    params: &ListParams,
) -> Result<(Vec<models::Person>, i64), String> {
    let query_span = tracing::info_span!("Fetch people.");

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM people p");
    push_filters(&mut count_query, filter);
    let count: i64 = count_query
        .build_query_scalar()
        .fetch_one(pool)
        .instrument(query_span.clone())
        .await
        .map_err(|err| {
            tracing::error!("Failed to count people, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    let mut query = QueryBuilder::<Postgres>::new("SELECT p.* FROM people p");
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY ")
        .push(params.order_by(ORDERING_FIELDS, DEFAULT_ORDERING).to_sql("p"))
        .push(" LIMIT ")
        .push_bind(params.page_size())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let people = query
        .build_query_as::<models::Person>()
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch people, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    Ok((people, count))
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::Person>, String> {
    let query_span = tracing::info_span!("Fetch person by id.");
    sqlx::query_as::<_, models::Person>("SELECT * FROM people WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch person, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

/// Acting credits, most recent release first.
pub async fn cast_roles(pool: &PgPool, person_id: Uuid) -> Result<Vec<models::CastRole>, String> {
    let query_span = tracing::info_span!("Fetch cast roles of person.");
    sqlx::query_as::<_, models::CastRole>(
        r#"
        SELECT mc.character_name, mc.cast_order,
               m.id, m.title, m.release_date, m.poster_url, m.vote_average, m.popularity_score
        FROM movie_cast mc
        JOIN movies m ON m.id = mc.movie_id
        WHERE mc.person_id = $1
        ORDER BY m.release_date DESC NULLS LAST, m.id
        "#,
    )
    .bind(person_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch cast roles, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn crew_roles(pool: &PgPool, person_id: Uuid) -> Result<Vec<models::CrewRole>, String> {
    let query_span = tracing::info_span!("Fetch crew roles of person.");
    sqlx::query_as::<_, models::CrewRole>(
        r#"
        SELECT mc.job, mc.department,
               m.id, m.title, m.release_date, m.poster_url, m.vote_average, m.popularity_score
        FROM movie_crew mc
        JOIN movies m ON m.id = mc.movie_id
        WHERE mc.person_id = $1
        ORDER BY m.release_date DESC NULLS LAST, m.id, mc.job
        "#,
    )
    .bind(person_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch crew roles, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

const INSERT_PERSON: &str = r#"
    INSERT INTO people (
        id, name, biography, birthday, deathday, place_of_birth, profile_image_url,
        imdb_id, tmdb_id, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

pub async fn insert(pool: &PgPool, person: models::Person) -> Result<models::Person, WriteError> {
    let query_span = tracing::info_span!("Saving person into the database");
    sqlx::query(INSERT_PERSON)
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.biography)
        .bind(person.birthday)
        .bind(person.deathday)
        .bind(&person.place_of_birth)
        .bind(&person.profile_image_url)
        .bind(&person.imdb_id)
        .bind(person.tmdb_id)
        .bind(person.created_at)
        .bind(person.updated_at)
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| person)
        .map_err(|err| WriteError::from_sqlx(err, "person"))
}

pub async fn update(pool: &PgPool, person: models::Person) -> Result<models::Person, WriteError> {
    let query_span = tracing::info_span!("Updating person");
    sqlx::query(
        r#"
        UPDATE people SET
            name = $2, biography = $3, birthday = $4, deathday = $5, place_of_birth = $6,
            profile_image_url = $7, imdb_id = $8, tmdb_id = $9, updated_at = $10
        WHERE id = $1
        "#,
    )
    .bind(person.id)
    .bind(&person.name)
    .bind(&person.biography)
    .bind(person.birthday)
    .bind(person.deathday)
    .bind(&person.place_of_birth)
    .bind(&person.profile_image_url)
    .bind(&person.imdb_id)
    .bind(person.tmdb_id)
    .bind(person.updated_at)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| person)
    .map_err(|err| WriteError::from_sqlx(err, "person"))
}

/// Removes the person and every credit naming them.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, String> {
    let query_span = tracing::info_span!("Delete person.", %id);

    async {
        let mut tx = pool.begin().await?;
        for statement in [
            "DELETE FROM movie_cast WHERE person_id = $1",
            "DELETE FROM movie_crew WHERE person_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut *tx).await?;
        }
        let deleted = sqlx::query("DELETE FROM people WHERE id = $1")
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
        tracing::error!("Failed to delete person, error: {:?}", err);
        "Failed to delete".to_string()
    })
}

pub async fn find_by_tmdb_id(conn: &mut PgConnection, tmdb_id: i32) -> Result<Option<models::Person>, sqlx::Error> {
    sqlx::query_as::<_, models::Person>("SELECT * FROM people WHERE tmdb_id = $1")
        .bind(tmdb_id)
        .fetch_optional(&mut *conn)
        .await
}

/// Inserts unless a person with the same TMDB id exists.
pub async fn insert_if_absent(conn: &mut PgConnection, person: &models::Person) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO people (
            id, name, biography, birthday, deathday, place_of_birth, profile_image_url,
            imdb_id, tmdb_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT ON CONSTRAINT people_tmdb_id_key DO NOTHING
        "#,
    )
    .bind(person.id)
    .bind(&person.name)
    .bind(&person.biography)
    .bind(person.birthday)
    .bind(person.deathday)
    .bind(&person.place_of_birth)
    .bind(&person.profile_image_url)
    .bind(&person.imdb_id)
    .bind(person.tmdb_id)
    .bind(person.created_at)
    .bind(person.updated_at)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}
