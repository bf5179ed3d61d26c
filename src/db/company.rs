use super::{like_pattern, non_blank, WriteError};
use crate::forms::{CompanyFilter, ListParams};
use crate::models;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::Instrument;
use uuid::Uuid;

pub const ORDERING_FIELDS: &[&str] = &["name", "origin_country", "created_at"];
pub const DEFAULT_ORDERING: &str = "name";

const WITH_COUNT: &str = "SELECT pc.*, \
     (SELECT COUNT(*) FROM movie_production_companies mpc WHERE mpc.company_id = pc.id) AS movie_count \
     FROM production_companies pc";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &CompanyFilter) {
    builder.push(" WHERE TRUE");
    if let Some(search) = non_blank(&filter.search) {
        builder.push(" AND pc.name ILIKE ").push_bind(like_pattern(search));
    }
    if let Some(name) = non_blank(&filter.name) {
        builder.push(" AND pc.name ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(country) = non_blank(&filter.origin_country) {
        builder
            .push(" AND UPPER(pc.origin_country) = ")
            .push_bind(country.to_uppercase());
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &CompanyFilter,
    params: &ListParams,
) -> Result<(Vec<models::CompanyWithCount>, i64), String> {
    let query_span = tracing::info_span!("Fetch production companies.");

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM production_companies pc");
    push_filters(&mut count_query, filter);
    let count: i64 = count_query
        .build_query_scalar()
        .fetch_one(pool)
        .instrument(query_span.clone())
        .await
        .map_err(|err| {
            tracing::error!("Failed to count companies, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    let mut query = QueryBuilder::<Postgres>::new(WITH_COUNT);
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY ")
        .push(params.order_by(ORDERING_FIELDS, DEFAULT_ORDERING).to_sql("pc"))
        .push(" LIMIT ")
        .push_bind(params.page_size())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let companies = query
        .build_query_as::<models::CompanyWithCount>()
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch companies, error: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    Ok((companies, count))
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::ProductionCompany>, String> {
    let query_span = tracing::info_span!("Fetch production company by id.");
    sqlx::query_as::<_, models::ProductionCompany>("SELECT * FROM production_companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch company, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn movies_of(pool: &PgPool, company_id: Uuid) -> Result<Vec<models::MovieBrief>, String> {
    let query_span = tracing::info_span!("Fetch movies of production company.");
    sqlx::query_as::<_, models::MovieBrief>(
        r#"
        SELECT m.id, m.title, m.release_date, m.poster_url, m.vote_average, m.popularity_score
        FROM movie_production_companies mpc
        JOIN movies m ON m.id = mpc.movie_id
        WHERE mpc.company_id = $1
        ORDER BY m.created_at DESC, m.id
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch movies of company, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn for_movies(pool: &PgPool, movie_ids: &[Uuid]) -> Result<Vec<models::MovieCompanyLink>, String> {
    let query_span = tracing::info_span!("Fetch production companies of movies.");
    sqlx::query_as::<_, models::MovieCompanyLink>(
        r#"
        SELECT mpc.movie_id, pc.id, pc.name, pc.logo_url, pc.origin_country, pc.created_at
        FROM movie_production_companies mpc
        JOIN production_companies pc ON pc.id = mpc.company_id
        WHERE mpc.movie_id = ANY($1)
        ORDER BY pc.name
        "#,
    )
    .bind(movie_ids)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch movie companies, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn insert(
    pool: &PgPool,
    company: models::ProductionCompany,
) -> Result<models::ProductionCompany, WriteError> {
    let query_span = tracing::info_span!("Saving production company into the database");
    sqlx::query(
        "INSERT INTO production_companies (id, name, logo_url, origin_country, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(company.id)
    .bind(&company.name)
    .bind(&company.logo_url)
    .bind(&company.origin_country)
    .bind(company.created_at)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| company)
    .map_err(|err| WriteError::from_sqlx(err, "production company"))
}

pub async fn update(
    pool: &PgPool,
    company: models::ProductionCompany,
) -> Result<models::ProductionCompany, WriteError> {
    let query_span = tracing::info_span!("Updating production company");
    sqlx::query(
        "UPDATE production_companies SET name = $2, logo_url = $3, origin_country = $4 WHERE id = $1",
    )
    .bind(company.id)
    .bind(&company.name)
    .bind(&company.logo_url)
    .bind(&company.origin_country)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| company)
    .map_err(|err| WriteError::from_sqlx(err, "production company"))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, String> {
    let query_span = tracing::info_span!("Delete production company.", %id);

    async {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM movie_production_companies WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM production_companies WHERE id = $1")
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
        tracing::error!("Failed to delete company, error: {:?}", err);
        "Failed to delete".to_string()
    })
}

pub async fn find_by_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<models::ProductionCompany>, sqlx::Error> {
    sqlx::query_as::<_, models::ProductionCompany>("SELECT * FROM production_companies WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn insert_if_absent(
    conn: &mut PgConnection,
    company: &models::ProductionCompany,
) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO production_companies (id, name, logo_url, origin_country, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT ON CONSTRAINT production_companies_name_key DO NOTHING
        "#,
    )
    .bind(company.id)
    .bind(&company.name)
    .bind(&company.logo_url)
    .bind(&company.origin_country)
    .bind(company.created_at)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}

pub async fn link_existing(
    conn: &mut PgConnection,
    movie_id: Uuid,
    company_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO movie_production_companies (id, movie_id, company_id)
        SELECT $1, $2, pc.id FROM production_companies pc WHERE pc.id = $3
        ON CONFLICT ON CONSTRAINT movie_production_companies_movie_company_key DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(movie_id)
    .bind(company_id)
    .execute(&mut *conn)
    .await
    .map(|result| result.rows_affected() > 0)
}
