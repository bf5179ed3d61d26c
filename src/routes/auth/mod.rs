pub mod login;
pub mod logout;
pub mod password;
pub mod preferences;
pub mod profile;
pub mod refresh;
pub mod register;

use crate::configuration::Settings;
use crate::helpers::{jwt, JsonResponse};
use crate::models;
use crate::views;
use actix_web::Error;

/// Profile plus a fresh token pair for a user that just proved who they are.
pub(crate) fn session(
    settings: &Settings,
    user: models::User,
    preferences: Option<models::UserPreferences>,
) -> Result<views::Session, Error> {
    let tokens = jwt::issue_pair(&settings.jwt, user.id).map_err(|err| {
        tracing::error!("Failed to issue tokens: {:?}", err);
        JsonResponse::<views::Session>::build().internal_server_error("")
    })?;

    Ok(views::Session::new(views::Profile::new(user, preferences), tokens))
}
