use crate::db;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::models;
use actix_web::{delete, web, HttpRequest, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Delete movie.", skip(req, pg_pool))]
#[delete("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    pg_pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    let (id,) = path.into_inner();

    match db::movie::delete(pg_pool.get_ref(), id).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Err(JsonResponse::<models::Movie>::build().not_found("Movie not found")),
        Err(err) => Err(JsonResponse::<models::Movie>::build().internal_server_error(err)),
    }
}
