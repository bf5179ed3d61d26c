use crate::db;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{delete, web, HttpRequest, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Delete genre.", skip(req, pg_pool))]
#[delete("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    pg_pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match db::genre::delete(pg_pool.get_ref(), path.into_inner().0).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Err(JsonResponse::<views::Genre>::build().not_found("Genre not found")),
        Err(err) => Err(JsonResponse::<views::Genre>::build().internal_server_error(err)),
    }
}
