use crate::models;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct RegisterForm {
    #[validate(max_length = 254)]
    #[validate(pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$")]
    pub email: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 150)]
    pub username: String,
    #[validate(min_length = 8)]
    #[validate(max_length = 128)]
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    #[validate(max_length = 50)]
    pub first_name: String,
    #[serde(default)]
    #[validate(max_length = 50)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub profile_image: Option<String>,
}

impl RegisterForm {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }

    /// Builds the user row around an already hashed password.
    pub fn into_user(self, password_hash: String) -> models::User {
        models::User {
            id: uuid::Uuid::new_v4(),
            email: self.email.trim().to_lowercase(),
            username: self.username.trim().to_string(),
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            is_admin: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
            profile_image: self.profile_image,
            bio: self.bio,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct LoginForm {
    #[validate(min_length = 1)]
    pub email: String,
    #[validate(min_length = 1)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct ProfileForm {
    #[validate(max_length = 50)]
    pub first_name: Option<String>,
    #[validate(max_length = 50)]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileForm {
    pub fn update(self, user: &mut models::User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if self.profile_image.is_some() {
            user.profile_image = self.profile_image;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct PreferencesForm {
    pub favorite_genres: Option<Vec<String>>,
    pub preferred_languages: Option<Vec<String>>,
    pub email_notifications: Option<bool>,
}

impl PreferencesForm {
    pub fn update(self, preferences: &mut models::UserPreferences) {
        if let Some(favorite_genres) = self.favorite_genres {
            preferences.favorite_genres = Json(favorite_genres);
        }
        if let Some(preferred_languages) = self.preferred_languages {
            preferences.preferred_languages = Json(preferred_languages);
        }
        if let Some(email_notifications) = self.email_notifications {
            preferences.email_notifications = email_notifications;
        }
        preferences.updated_at = Utc::now();
    }
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct ChangePasswordForm {
    #[validate(min_length = 1)]
    pub old_password: String,
    #[validate(min_length = 8)]
    #[validate(max_length = 128)]
    pub new_password: String,
    pub new_password_confirm: String,
}

impl ChangePasswordForm {
    pub fn passwords_match(&self) -> bool {
        self.new_password == self.new_password_confirm
    }
}

/// Body of refresh and logout: a refresh token.
#[derive(Serialize, Deserialize, Debug)]
pub struct RefreshForm {
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(value: serde_json::Value) -> RegisterForm {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn registration_rules() {
        let ok = register(json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "longenough",
            "password_confirm": "longenough"
        }));
        assert!(ok.validate().is_ok());
        assert!(ok.passwords_match());

        let short = register(json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "short",
            "password_confirm": "short"
        }));
        assert!(short.validate().is_err());

        let bad_email = register(json!({
            "email": "not-an-email",
            "username": "ann",
            "password": "longenough",
            "password_confirm": "longenough"
        }));
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn email_is_normalised_on_create() {
        let user = register(json!({
            "email": " Ann@Example.COM ",
            "username": "ann",
            "password": "longenough",
            "password_confirm": "different"
        }))
        .into_user("hash".to_string());

        assert_eq!(user.email, "ann@example.com");
        assert!(!user.is_admin);
        assert!(user.is_active);
    }

    #[test]
    fn preferences_patch_only_touches_given_fields() {
        let mut preferences = models::UserPreferences::new(uuid::Uuid::new_v4());
        let form: PreferencesForm = serde_json::from_value(json!({"favorite_genres": ["Drama"]})).unwrap();
        form.update(&mut preferences);

        assert_eq!(preferences.favorite_genres.0, vec!["Drama".to_string()]);
        assert!(preferences.preferred_languages.0.is_empty());
        assert!(preferences.email_notifications);
    }
}
