use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::{password, JsonResponse};
use crate::views;
use actix_web::{post, web, Responder, Result};
use chrono::Utc;
use serde_valid::Validate;
use sqlx::PgPool;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[tracing::instrument(name = "Login.", skip_all)]
#[post("/login")]
pub async fn login(
    form: web::Json<forms::LoginForm>,
    settings: web::Data<Settings>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Session>::build().form_error(errors.to_string()));
    }
    let pool = pg_pool.get_ref();

    let mut user = db::user::fetch_by_email(pool, &form.email)
        .await
        .map_err(|err| JsonResponse::<views::Session>::build().internal_server_error(err))?
        .filter(|user| password::verify_password(&form.password, &user.password_hash))
        .ok_or_else(|| JsonResponse::<views::Session>::build().bad_request(INVALID_CREDENTIALS))?;

    if !user.is_active {
        return Err(JsonResponse::<views::Session>::build().bad_request("User account is disabled"));
    }

    db::user::touch_last_login(pool, user.id)
        .await
        .map_err(|err| JsonResponse::<views::Session>::build().internal_server_error(err))?;
    user.last_login = Some(Utc::now());

    let preferences = db::user::preferences(pool, user.id)
        .await
        .map_err(|err| JsonResponse::<views::Session>::build().internal_server_error(err))?;

    let session = super::session(settings.get_ref(), user, Some(preferences))?;
    Ok(JsonResponse::build().set_item(session).ok("Login successful"))
}
