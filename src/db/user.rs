use super::WriteError;
use crate::models;
use chrono::Utc;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

/// Saves a new account together with its default preferences.
pub async fn insert(
    pool: &PgPool,
    user: models::User,
) -> Result<(models::User, models::UserPreferences), WriteError> {
    let query_span = tracing::info_span!("Saving new user into the database", username = %user.username);
    let preferences = models::UserPreferences::new(user.id);

    async {
        let mut tx = pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, username, password_hash, first_name, last_name, is_admin,
                is_active, date_joined, last_login, profile_image, bio
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(user.is_active)
        .bind(user.date_joined)
        .bind(user.last_login)
        .bind(&user.profile_image)
        .bind(&user.bio)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_preferences (
                id, user_id, favorite_genres, preferred_languages, email_notifications,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(preferences.id)
        .bind(preferences.user_id)
        .bind(&preferences.favorite_genres)
        .bind(&preferences.preferred_languages)
        .bind(preferences.email_notifications)
        .bind(preferences.created_at)
        .bind(preferences.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }
    .instrument(query_span)
    .await
    .map(|_| (user, preferences))
    .map_err(|err| WriteError::from_sqlx(err, "user"))
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::User>, String> {
    let query_span = tracing::info_span!("Fetch user by id.");
    sqlx::query_as::<_, models::User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch user, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

/// Emails are stored lowercased, lookups follow suit.
pub async fn fetch_by_email(pool: &PgPool, email: &str) -> Result<Option<models::User>, String> {
    let query_span = tracing::info_span!("Fetch user by email.");
    sqlx::query_as::<_, models::User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch user, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), String> {
    let query_span = tracing::info_span!("Record user login.");
    sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
        .bind(id)
        .bind(Utc::now())
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to record login, error: {:?}", err);
            "Failed to update".to_string()
        })
}

pub async fn update_profile(pool: &PgPool, user: models::User) -> Result<models::User, String> {
    let query_span = tracing::info_span!("Updating user profile");
    sqlx::query(
        "UPDATE users SET first_name = $2, last_name = $3, bio = $4, profile_image = $5 WHERE id = $1",
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.bio)
    .bind(&user.profile_image)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| user)
    .map_err(|err| {
        tracing::error!("Failed to update profile, error: {:?}", err);
        "Failed to update".to_string()
    })
}

pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<(), String> {
    let query_span = tracing::info_span!("Updating user password");
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to update password, error: {:?}", err);
            "Failed to update".to_string()
        })
}

/// Preferences of the user, created with defaults when missing.
pub async fn preferences(pool: &PgPool, user_id: Uuid) -> Result<models::UserPreferences, String> {
    let query_span = tracing::info_span!("Fetch user preferences.");
    let defaults = models::UserPreferences::new(user_id);

    async {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (
                id, user_id, favorite_genres, preferred_languages, email_notifications,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(defaults.id)
        .bind(defaults.user_id)
        .bind(&defaults.favorite_genres)
        .bind(&defaults.preferred_languages)
        .bind(defaults.email_notifications)
        .bind(defaults.created_at)
        .bind(defaults.updated_at)
        .execute(pool)
        .await?;

        sqlx::query_as::<_, models::UserPreferences>("SELECT * FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch preferences, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn update_preferences(
    pool: &PgPool,
    preferences: models::UserPreferences,
) -> Result<models::UserPreferences, String> {
    let query_span = tracing::info_span!("Updating user preferences");
    sqlx::query(
        r#"
        UPDATE user_preferences SET
            favorite_genres = $2, preferred_languages = $3, email_notifications = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(preferences.id)
    .bind(&preferences.favorite_genres)
    .bind(&preferences.preferred_languages)
    .bind(preferences.email_notifications)
    .bind(preferences.updated_at)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| preferences)
    .map_err(|err| {
        tracing::error!("Failed to update preferences, error: {:?}", err);
        "Failed to update".to_string()
    })
}
