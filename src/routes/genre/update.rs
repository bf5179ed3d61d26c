use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{patch, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use uuid::Uuid;

async fn apply(
    pg_pool: &PgPool,
    id: Uuid,
    patch: forms::GenrePatch,
) -> Result<web::Json<JsonResponse<views::Genre>>> {
    let mut genre = db::genre::fetch(pg_pool, id)
        .await
        .map_err(|err| JsonResponse::<views::Genre>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::Genre>::build().not_found("Genre not found"))?;
    patch.update(&mut genre);

    db::genre::update(pg_pool, genre)
        .await
        .map_err(|err| crate::routes::write_error(err, "Genre"))
        .map(|genre| JsonResponse::build().set_item(views::Genre::from(genre)).ok("Genre updated"))
}

#[tracing::instrument(name = "Update genre.", skip(req, pg_pool))]
#[put("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::GenreForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Genre>::build().form_error(errors.to_string()));
    }

    apply(pg_pool.get_ref(), path.into_inner().0, form.into_inner().into()).await
}

#[tracing::instrument(name = "Partially update genre.", skip(req, pg_pool))]
#[patch("/{id}")]
pub async fn partial(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::GenrePatch>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Genre>::build().form_error(errors.to_string()));
    }

    apply(pg_pool.get_ref(), path.into_inner().0, form.into_inner()).await
}
