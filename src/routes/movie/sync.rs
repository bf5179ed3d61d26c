use crate::connectors::TmdbConnector;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::services::{self, SyncError};
use crate::views;
use actix_web::{post, web, Either, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

/// 201 when imported, 200 when the movie was already in the catalog.
#[tracing::instrument(name = "Sync movie from TMDB.", skip(req, pg_pool, tmdb))]
#[post("/sync_from_tmdb")]
pub async fn sync_from_tmdb(
    req: HttpRequest,
    form: web::Json<forms::SyncRequest>,
    pg_pool: web::Data<PgPool>,
    tmdb: web::Data<Arc<dyn TmdbConnector>>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::MovieDetail>::build().form_error(errors.to_string()));
    }
    let tmdb_id = form
        .tmdb_id
        .ok_or_else(|| JsonResponse::<views::MovieDetail>::build().bad_request("tmdb_id is required"))?;

    let outcome = services::sync::sync_from_external_id(pg_pool.get_ref(), tmdb.get_ref().as_ref(), tmdb_id)
        .await
        .map_err(|err| match err {
            SyncError::Unavailable(_) => JsonResponse::<views::MovieDetail>::build()
                .not_found(format!("Movie with TMDB ID {} not found", tmdb_id)),
            SyncError::Failed(msg) => JsonResponse::<views::MovieDetail>::build().internal_server_error(msg),
        })?;

    let created = outcome.is_created();
    let detail = super::load_detail(pg_pool.get_ref(), outcome.into_movie())
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))?;

    let response = JsonResponse::build().set_id(detail.movie.id).set_item(detail);
    if created {
        Ok(Either::Left(response.created("Movie synced from TMDB")))
    } else {
        Ok(Either::Right(response.ok("Movie already exists")))
    }
}

#[tracing::instrument(name = "Sync genres from TMDB.", skip(req, pg_pool, tmdb))]
#[post("/sync_genres_from_tmdb")]
pub async fn sync_genres_from_tmdb(
    req: HttpRequest,
    pg_pool: web::Data<PgPool>,
    tmdb: web::Data<Arc<dyn TmdbConnector>>,
) -> Result<impl Responder> {
    require_admin(&req)?;

    services::sync::sync_genres(pg_pool.get_ref(), tmdb.get_ref().as_ref())
        .await
        .map(|genres| {
            let count = genres.len();
            JsonResponse::build()
                .set_list(genres.into_iter().map(views::Genre::from).collect())
                .ok(format!("Synced {} genres from TMDB", count))
        })
        .map_err(|err| match err {
            SyncError::Unavailable(_) => {
                JsonResponse::<views::Genre>::build().not_found("Genre list not available from TMDB")
            }
            SyncError::Failed(msg) => JsonResponse::<views::Genre>::build().internal_server_error(msg),
        })
}
