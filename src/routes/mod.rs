pub mod auth;
pub mod company;
pub mod genre;
pub mod health_checks;
pub mod movie;
pub mod person;

pub use health_checks::*;

use crate::db::WriteError;
use crate::helpers::JsonResponse;
use actix_web::Error;

/// Duplicate natural keys are a client error; anything else is ours.
pub(crate) fn write_error(err: WriteError, what: &str) -> Error {
    match err {
        WriteError::Conflict(_) => {
            JsonResponse::<()>::build().bad_request(format!("{what} with these details already exists"))
        }
        WriteError::Failed(msg) => JsonResponse::<()>::build().internal_server_error(msg),
    }
}
