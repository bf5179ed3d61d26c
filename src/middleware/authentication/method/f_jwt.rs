use crate::configuration::Settings;
use crate::db;
use crate::helpers::jwt::{extract_bearer_token, verify_token, TokenType};
use crate::middleware::authentication::get_header;
use actix_web::dev::ServiceRequest;
use actix_web::{web, HttpMessage};
use sqlx::PgPool;
use std::sync::Arc;

/// `Ok(false)` when no `Authorization` header is present; any header that is
/// there must carry a valid access token.
#[tracing::instrument(name = "Authenticate with JWT", skip(req))]
pub async fn try_jwt(req: &mut ServiceRequest) -> Result<bool, String> {
    let authorization = match get_header::<String>(req, "authorization")? {
        Some(authorization) => authorization,
        None => return Ok(false),
    };
    let token = extract_bearer_token(&authorization)?;

    let settings = req
        .app_data::<web::Data<Settings>>()
        .cloned()
        .ok_or_else(|| "authentication is not configured".to_string())?;
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| "authentication is not configured".to_string())?;

    let claims = verify_token(&settings.jwt, token, TokenType::Access).map_err(|err| {
        tracing::debug!("JWT rejected: {}", err);
        "Given token not valid for any token type".to_string()
    })?;

    let user = db::user::fetch(pool.get_ref(), claims.sub)
        .await?
        .ok_or_else(|| "User not found".to_string())?;
    if !user.is_active {
        return Err("User is inactive".to_string());
    }

    tracing::debug!(user_id = %user.id, "JWT authentication successful");
    if req.extensions_mut().insert(Arc::new(user)).is_some() {
        return Err("user already logged".to_string());
    }

    Ok(true)
}
