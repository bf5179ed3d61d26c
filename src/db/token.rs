//! Revoked refresh token ids.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn revoke(pool: &PgPool, jti: &str, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), String> {
    let query_span = tracing::info_span!("Revoke token.", %user_id);
    sqlx::query(
        "INSERT INTO token_blacklist (jti, user_id, expires_at, created_at) VALUES ($1, $2, $3, NOW()) \
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!("Failed to revoke token, error: {:?}", err);
        "Failed to revoke token".to_string()
    })
}

pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, String> {
    let query_span = tracing::info_span!("Check token blacklist.");
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM token_blacklist WHERE jti = $1)")
        .bind(jti)
        .fetch_one(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to check token blacklist, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}
