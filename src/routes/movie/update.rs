use crate::db;
use crate::forms;
use crate::forms::MovieRelations;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::models;
use crate::views;
use actix_web::{patch, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use uuid::Uuid;

async fn existing(pg_pool: &PgPool, id: Uuid) -> Result<models::Movie> {
    db::movie::fetch(pg_pool, id)
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::MovieDetail>::build().not_found("Movie not found"))
}

async fn save(
    pg_pool: &PgPool,
    movie: models::Movie,
    relations: MovieRelations,
) -> Result<web::Json<JsonResponse<views::MovieDetail>>> {
    let movie = db::movie::update(pg_pool, movie, &relations)
        .await
        .map_err(|err| crate::routes::write_error(err, "Movie"))?
        .ok_or_else(|| JsonResponse::<views::MovieDetail>::build().not_found("Movie not found"))?;

    super::load_detail(pg_pool, movie)
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))
        .map(|detail| JsonResponse::build().set_item(detail).ok("Movie updated"))
}

#[tracing::instrument(name = "Update movie.", skip(req, pg_pool))]
#[put("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::MovieForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::MovieDetail>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let mut movie = existing(pg_pool.get_ref(), id).await?;
    let relations = form.into_inner().update(&mut movie);

    save(pg_pool.get_ref(), movie, relations).await
}

#[tracing::instrument(name = "Partially update movie.", skip(req, pg_pool))]
#[patch("/{id}")]
pub async fn partial(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::MoviePatch>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::MovieDetail>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let mut movie = existing(pg_pool.get_ref(), id).await?;
    let relations = form.into_inner().update(&mut movie);

    save(pg_pool.get_ref(), movie, relations).await
}
