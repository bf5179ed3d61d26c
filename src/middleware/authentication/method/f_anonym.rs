use actix_web::dev::ServiceRequest;

/// Requests without credentials go through with no user attached.
#[tracing::instrument(name = "authenticate as anonym", skip(_req))]
pub fn anonym(_req: &mut ServiceRequest) -> Result<bool, String> {
    Ok(true)
}
