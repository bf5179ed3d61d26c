//! Per-handler permission checks on the user attached by authentication.

use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{Error, HttpMessage, HttpRequest};
use std::sync::Arc;

pub fn current_user(req: &HttpRequest) -> Option<Arc<models::User>> {
    req.extensions().get::<Arc<models::User>>().cloned()
}

/// 401 for anonymous callers.
pub fn require_user(req: &HttpRequest) -> Result<Arc<models::User>, Error> {
    current_user(req).ok_or_else(|| {
        JsonResponse::<()>::build().unauthorized("Authentication credentials were not provided")
    })
}

/// 401 for anonymous callers, 403 for authenticated non-admins.
pub fn require_admin(req: &HttpRequest) -> Result<Arc<models::User>, Error> {
    let user = require_user(req)?;
    if !user.is_admin {
        return Err(JsonResponse::<()>::build()
            .forbidden("You do not have permission to perform this action"));
    }

    Ok(user)
}
