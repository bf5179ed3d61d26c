use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List production companies.", skip(pg_pool))]
#[get("")]
pub async fn list(
    filter: web::Query<forms::CompanyFilter>,
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::company::list(pg_pool.get_ref(), &filter, &params)
        .await
        .map_err(|err| JsonResponse::<views::Company>::build().internal_server_error(err))
        .map(|(companies, count)| {
            JsonResponse::build()
                .set_list(companies.into_iter().map(views::Company::from).collect())
                .set_meta(params.meta(count))
                .ok("OK")
        })
}

#[tracing::instrument(name = "Get production company.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(Uuid,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();

    let company = db::company::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<views::CompanyDetail>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::CompanyDetail>::build().not_found("Production company not found"))?;

    let movies = db::company::movies_of(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<views::CompanyDetail>::build().internal_server_error(err))?;

    let detail = views::CompanyDetail {
        company: views::Company {
            movie_count: Some(movies.len() as i64),
            ..views::Company::from(company)
        },
        movies,
    };

    Ok(JsonResponse::build().set_item(detail).ok("OK"))
}
