use crate::helpers::jwt::TokenPair;
use crate::models;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Preferences {
    pub id: Uuid,
    pub favorite_genres: Vec<String>,
    pub preferred_languages: Vec<String>,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::UserPreferences> for Preferences {
    fn from(preferences: models::UserPreferences) -> Self {
        Self {
            id: preferences.id,
            favorite_genres: preferences.favorite_genres.0,
            preferred_languages: preferences.preferred_languages.0,
            email_notifications: preferences.email_notifications,
            created_at: preferences.created_at,
            updated_at: preferences.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub bio: String,
    pub profile_image: Option<String>,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub preferences: Option<Preferences>,
}

impl Profile {
    pub fn new(user: models::User, preferences: Option<models::UserPreferences>) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            profile_image: user.profile_image,
            is_admin: user.is_admin,
            date_joined: user.date_joined,
            last_login: user.last_login,
            preferences: preferences.map(Preferences::from),
        }
    }
}

/// Register and login answer.
#[derive(Debug, Serialize)]
pub struct Session {
    pub user: Profile,
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn new(user: Profile, tokens: TokenPair) -> Self {
        Self {
            user,
            access: tokens.access,
            refresh: tokens.refresh,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}
