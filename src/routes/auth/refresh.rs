use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::jwt::{self, TokenType};
use crate::helpers::JsonResponse;
use crate::views;
use actix_web::{post, web, Responder, Result};
use sqlx::PgPool;

#[tracing::instrument(name = "Refresh access token.", skip_all)]
#[post("/refresh")]
pub async fn refresh(
    form: web::Json<forms::RefreshForm>,
    settings: web::Data<Settings>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let token = form
        .into_inner()
        .refresh
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| JsonResponse::<views::AccessToken>::build().bad_request("Refresh token is required"))?;

    let claims = jwt::verify_token(&settings.jwt, &token, TokenType::Refresh).map_err(|err| {
        tracing::debug!("Refresh rejected: {}", err);
        JsonResponse::<views::AccessToken>::build().unauthorized("Token is invalid or expired")
    })?;

    let revoked = db::token::is_revoked(pg_pool.get_ref(), &claims.jti)
        .await
        .map_err(|err| JsonResponse::<views::AccessToken>::build().internal_server_error(err))?;
    if revoked {
        return Err(JsonResponse::<views::AccessToken>::build().unauthorized("Token is blacklisted"));
    }

    let access = jwt::issue_token(&settings.jwt, claims.sub, TokenType::Access).map_err(|err| {
        tracing::error!("Failed to issue access token: {:?}", err);
        JsonResponse::<views::AccessToken>::build().internal_server_error("")
    })?;

    Ok(JsonResponse::build().set_item(views::AccessToken { access }).ok("OK"))
}
