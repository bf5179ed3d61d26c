//! Cast and crew credits of a movie.

use crate::models;
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;
use uuid::Uuid;

pub async fn cast_of(pool: &PgPool, movie_id: Uuid) -> Result<Vec<models::CastMember>, String> {
    let query_span = tracing::info_span!("Fetch cast of movie.");
    sqlx::query_as::<_, models::CastMember>(
        r#"
        SELECT mc.id AS credit_id, mc.character_name, mc.cast_order, mc.created_at AS credited_at, p.*
        FROM movie_cast mc
        JOIN people p ON p.id = mc.person_id
        WHERE mc.movie_id = $1
        ORDER BY mc.cast_order ASC NULLS LAST, p.name
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch cast, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn crew_of(pool: &PgPool, movie_id: Uuid) -> Result<Vec<models::CrewMember>, String> {
    let query_span = tracing::info_span!("Fetch crew of movie.");
    sqlx::query_as::<_, models::CrewMember>(
        r#"
        SELECT mc.id AS credit_id, mc.job, mc.department, mc.created_at AS credited_at, p.*
        FROM movie_crew mc
        JOIN people p ON p.id = mc.person_id
        WHERE mc.movie_id = $1
        ORDER BY mc.department, mc.job, p.name
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch crew, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// A repeated (movie, person) pair is ignored.
pub async fn insert_cast(
    conn: &mut PgConnection,
    movie_id: Uuid,
    person_id: Uuid,
    character_name: &str,
    cast_order: Option<i32>,
) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO movie_cast (id, movie_id, person_id, character_name, cast_order, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT ON CONSTRAINT movie_cast_movie_person_key DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(movie_id)
    .bind(person_id)
    .bind(character_name)
    .bind(cast_order)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}

/// A repeated (movie, person, job) triple is ignored.
pub async fn insert_crew(
    conn: &mut PgConnection,
    movie_id: Uuid,
    person_id: Uuid,
    job: &str,
    department: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO movie_crew (id, movie_id, person_id, job, department, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT ON CONSTRAINT movie_crew_movie_person_job_key DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(movie_id)
    .bind(person_id)
    .bind(job)
    .bind(department)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}
