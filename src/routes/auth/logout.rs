use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::jwt::{self, TokenType};
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_user;
use actix_web::{post, web, HttpRequest, Responder, Result};
use chrono::{TimeZone, Utc};
use sqlx::PgPool;

/// Blacklists the given refresh token. A missing token still logs out.
#[tracing::instrument(name = "Logout.", skip_all)]
#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    form: web::Json<forms::RefreshForm>,
    settings: web::Data<Settings>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let user = require_user(&req)?;

    if let Some(token) = form.into_inner().refresh {
        let claims = jwt::verify_token(&settings.jwt, &token, TokenType::Refresh)
            .ok()
            .filter(|claims| claims.sub == user.id)
            .ok_or_else(|| JsonResponse::<()>::build().bad_request("Invalid token"))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);

        db::token::revoke(pg_pool.get_ref(), &claims.jti, user.id, expires_at)
            .await
            .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))?;
    }

    Ok(JsonResponse::<()>::build().ok("Logout successful"))
}
