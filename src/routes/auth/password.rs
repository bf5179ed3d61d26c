use crate::db;
use crate::forms;
use crate::helpers::{password, JsonResponse};
use crate::middleware::authorization::require_user;
use actix_web::{post, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Change password.", skip_all)]
#[post("/change-password")]
pub async fn change(
    req: HttpRequest,
    form: web::Json<forms::ChangePasswordForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let user = require_user(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<()>::build().form_error(errors.to_string()));
    }
    if !password::verify_password(&form.old_password, &user.password_hash) {
        return Err(JsonResponse::<()>::build().bad_request("Old password is incorrect"));
    }
    if !form.passwords_match() {
        return Err(JsonResponse::<()>::build().bad_request("New password fields didn't match"));
    }

    let hash = password::hash_password(&form.new_password)
        .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))?;
    db::user::update_password(pg_pool.get_ref(), user.id, &hash)
        .await
        .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(JsonResponse::<()>::build().ok("Password changed successfully"))
}
