use crate::configuration::JwtSettings;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn issue_token(
    settings: &JwtSettings,
    user_id: Uuid,
    token_type: TokenType,
) -> Result<String, jsonwebtoken::errors::Error> {
    let ttl = match token_type {
        TokenType::Access => settings.access_token_ttl_secs,
        TokenType::Refresh => settings.refresh_token_ttl_secs,
    };
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::seconds(ttl)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().simple().to_string(),
        token_type,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
}

pub fn issue_pair(settings: &JwtSettings, user_id: Uuid) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access: issue_token(settings, user_id, TokenType::Access)?,
        refresh: issue_token(settings, user_id, TokenType::Refresh)?,
    })
}

/// Checks signature and expiry, then that the token has the expected type.
pub fn verify_token(settings: &JwtSettings, token: &str, expected: TokenType) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| format!("invalid token: {err}"))?;

    if claims.token_type != expected {
        return Err("wrong token type".to_string());
    }

    Ok(claims)
}

pub fn extract_bearer_token(authorization: &str) -> Result<&str, String> {
    authorization
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| "authorization header is not a bearer token".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret".to_string(),
            access_token_ttl_secs: 60,
            refresh_token_ttl_secs: 120,
        }
    }

    #[test]
    fn access_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(&settings(), user_id, TokenType::Access).unwrap();

        let claims = verify_token(&settings(), &token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let pair = issue_pair(&settings(), Uuid::new_v4()).unwrap();

        assert!(verify_token(&settings(), &pair.refresh, TokenType::Access).is_err());
        assert!(verify_token(&settings(), &pair.refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = issue_token(&settings(), Uuid::new_v4(), TokenType::Access).unwrap();
        let other = JwtSettings {
            secret: "another".to_string(),
            ..settings()
        };

        assert!(verify_token(&other, &token, TokenType::Access).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtSettings {
            access_token_ttl_secs: -10,
            ..settings()
        };
        let token = issue_token(&expired, Uuid::new_v4(), TokenType::Access).unwrap();

        assert!(verify_token(&settings(), &token, TokenType::Access).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }
}
