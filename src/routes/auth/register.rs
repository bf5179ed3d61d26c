use crate::configuration::Settings;
use crate::db::{self, WriteError};
use crate::forms;
use crate::helpers::{password, JsonResponse};
use crate::views;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Register user.", skip_all)]
#[post("/register")]
pub async fn register(
    form: web::Json<forms::RegisterForm>,
    settings: web::Data<Settings>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Session>::build().form_error(errors.to_string()));
    }
    if !form.passwords_match() {
        return Err(JsonResponse::<views::Session>::build().bad_request("Password fields didn't match"));
    }

    let form = form.into_inner();
    let hash = password::hash_password(&form.password)
        .map_err(|err| JsonResponse::<views::Session>::build().internal_server_error(err))?;

    let (user, preferences) = db::user::insert(pg_pool.get_ref(), form.into_user(hash))
        .await
        .map_err(|err| match err {
            WriteError::Conflict(constraint) if constraint.contains("username") => {
                JsonResponse::<views::Session>::build().bad_request("A user with that username already exists")
            }
            WriteError::Conflict(_) => {
                JsonResponse::<views::Session>::build().bad_request("A user with that email already exists")
            }
            WriteError::Failed(msg) => JsonResponse::<views::Session>::build().internal_server_error(msg),
        })?;

    tracing::info!(user_id = %user.id, "User registered");
    let session = super::session(settings.get_ref(), user, Some(preferences))?;

    Ok(JsonResponse::build()
        .set_id(session.user.id)
        .set_item(session)
        .created("User registered successfully"))
}
