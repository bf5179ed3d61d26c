use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_user;
use crate::models;
use crate::views;
use actix_web::{get, patch, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

async fn profile_of(pg_pool: &PgPool, user: models::User) -> Result<web::Json<JsonResponse<views::Profile>>> {
    let preferences = db::user::preferences(pg_pool, user.id)
        .await
        .map_err(|err| JsonResponse::<views::Profile>::build().internal_server_error(err))?;

    Ok(JsonResponse::build()
        .set_item(views::Profile::new(user, Some(preferences)))
        .ok("OK"))
}

async fn apply(
    req: &HttpRequest,
    form: forms::ProfileForm,
    pg_pool: &PgPool,
) -> Result<web::Json<JsonResponse<views::Profile>>> {
    let mut user = models::User::clone(&*require_user(req)?);
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Profile>::build().form_error(errors.to_string()));
    }
    form.update(&mut user);

    let user = db::user::update_profile(pg_pool, user)
        .await
        .map_err(|err| JsonResponse::<views::Profile>::build().internal_server_error(err))?;
    profile_of(pg_pool, user).await
}

#[tracing::instrument(name = "Get profile.", skip_all)]
#[get("/profile")]
pub async fn item(req: HttpRequest, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let user = require_user(&req)?;
    profile_of(pg_pool.get_ref(), models::User::clone(&user)).await
}

#[tracing::instrument(name = "Update profile.", skip_all)]
#[put("/profile")]
pub async fn update(
    req: HttpRequest,
    form: web::Json<forms::ProfileForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    apply(&req, form.into_inner(), pg_pool.get_ref()).await
}

#[tracing::instrument(name = "Partially update profile.", skip_all)]
#[patch("/profile")]
pub async fn partial(
    req: HttpRequest,
    form: web::Json<forms::ProfileForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    apply(&req, form.into_inner(), pg_pool.get_ref()).await
}
