use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{patch, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use uuid::Uuid;

async fn apply(
    pg_pool: &PgPool,
    id: Uuid,
    patch: forms::CompanyPatch,
) -> Result<web::Json<JsonResponse<views::Company>>> {
    let mut company = db::company::fetch(pg_pool, id)
        .await
        .map_err(|err| JsonResponse::<views::Company>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::Company>::build().not_found("Production company not found"))?;
    patch.update(&mut company);

    db::company::update(pg_pool, company)
        .await
        .map_err(|err| crate::routes::write_error(err, "Production company"))
        .map(|company| JsonResponse::build().set_item(views::Company::from(company)).ok("Production company updated"))
}

#[tracing::instrument(name = "Update production company.", skip(req, pg_pool))]
#[put("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::CompanyForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Company>::build().form_error(errors.to_string()));
    }

    apply(pg_pool.get_ref(), path.into_inner().0, form.into_inner().into()).await
}

#[tracing::instrument(name = "Partially update production company.", skip(req, pg_pool))]
#[patch("/{id}")]
pub async fn partial(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::CompanyPatch>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Company>::build().form_error(errors.to_string()));
    }

    apply(pg_pool.get_ref(), path.into_inner().0, form.into_inner()).await
}
