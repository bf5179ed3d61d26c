use crate::db;
use crate::db::movie::Showcase;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List movies.", skip(pg_pool))]
#[get("")]
pub async fn list(
    filter: web::Query<forms::MovieFilter>,
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (movies, count) = db::movie::list(pg_pool.get_ref(), &filter, &params)
        .await
        .map_err(|err| JsonResponse::<views::MovieListItem>::build().internal_server_error(err))?;

    super::list_items(pg_pool.get_ref(), movies)
        .await
        .map_err(|err| JsonResponse::<views::MovieListItem>::build().internal_server_error(err))
        .map(|items| {
            JsonResponse::build()
                .set_list(items)
                .set_meta(params.meta(count))
                .ok("OK")
        })
}

async fn showcase(
    pg_pool: &PgPool,
    showcase: Showcase,
    params: &forms::ListParams,
) -> Result<web::Json<JsonResponse<views::MovieListItem>>> {
    let (movies, count) = db::movie::list_showcase(pg_pool, showcase, params)
        .await
        .map_err(|err| JsonResponse::<views::MovieListItem>::build().internal_server_error(err))?;

    super::list_items(pg_pool, movies)
        .await
        .map_err(|err| JsonResponse::<views::MovieListItem>::build().internal_server_error(err))
        .map(|items| {
            JsonResponse::build()
                .set_list(items)
                .set_meta(params.meta(count))
                .ok("OK")
        })
}

#[tracing::instrument(name = "List featured movies.", skip(pg_pool))]
#[get("/featured")]
pub async fn featured(
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    showcase(pg_pool.get_ref(), Showcase::Featured, &params).await
}

#[tracing::instrument(name = "List popular movies.", skip(pg_pool))]
#[get("/popular")]
pub async fn popular(
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    showcase(pg_pool.get_ref(), Showcase::Popular, &params).await
}

#[tracing::instrument(name = "List top rated movies.", skip(pg_pool))]
#[get("/top_rated")]
pub async fn top_rated(
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    showcase(pg_pool.get_ref(), Showcase::TopRated, &params).await
}

#[tracing::instrument(name = "Get movie.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(Uuid,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();

    let movie = db::movie::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::MovieDetail>::build().not_found("Movie not found"))?;

    super::load_detail(pg_pool.get_ref(), movie)
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))
        .map(|detail| JsonResponse::build().set_item(detail).ok("OK"))
}
