use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_user;
use crate::views;
use actix_web::{get, patch, put, web, HttpRequest, Responder, Result};
use sqlx::PgPool;

async fn apply(
    req: &HttpRequest,
    form: forms::PreferencesForm,
    pg_pool: &PgPool,
) -> Result<web::Json<JsonResponse<views::Preferences>>> {
    let user = require_user(req)?;
    let mut preferences = db::user::preferences(pg_pool, user.id)
        .await
        .map_err(|err| JsonResponse::<views::Preferences>::build().internal_server_error(err))?;
    form.update(&mut preferences);

    db::user::update_preferences(pg_pool, preferences)
        .await
        .map_err(|err| JsonResponse::<views::Preferences>::build().internal_server_error(err))
        .map(|preferences| {
            JsonResponse::build()
                .set_item(views::Preferences::from(preferences))
                .ok("Preferences updated")
        })
}

#[tracing::instrument(name = "Get preferences.", skip_all)]
#[get("/preferences")]
pub async fn item(req: HttpRequest, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let user = require_user(&req)?;

    db::user::preferences(pg_pool.get_ref(), user.id)
        .await
        .map_err(|err| JsonResponse::<views::Preferences>::build().internal_server_error(err))
        .map(|preferences| {
            JsonResponse::build()
                .set_item(views::Preferences::from(preferences))
                .ok("OK")
        })
}

#[tracing::instrument(name = "Update preferences.", skip_all)]
#[put("/preferences")]
pub async fn update(
    req: HttpRequest,
    form: web::Json<forms::PreferencesForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    apply(&req, form.into_inner(), pg_pool.get_ref()).await
}

#[tracing::instrument(name = "Partially update preferences.", skip_all)]
#[patch("/preferences")]
pub async fn partial(
    req: HttpRequest,
    form: web::Json<forms::PreferencesForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    apply(&req, form.into_inner(), pg_pool.get_ref()).await
}
