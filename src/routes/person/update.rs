use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::models;
use crate::views;
use actix_web::{patch, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use uuid::Uuid;

async fn existing(pg_pool: &PgPool, id: Uuid) -> Result<models::Person> {
    db::person::fetch(pg_pool, id)
        .await
        .map_err(|err| JsonResponse::<views::Person>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::Person>::build().not_found("Person not found"))
}

async fn save(pg_pool: &PgPool, person: models::Person) -> Result<web::Json<JsonResponse<views::Person>>> {
    db::person::update(pg_pool, person)
        .await
        .map_err(|err| crate::routes::write_error(err, "Person"))
        .map(|person| JsonResponse::build().set_item(views::Person::from(person)).ok("Person updated"))
}

#[tracing::instrument(name = "Update person.", skip(req, pg_pool))]
#[put("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::PersonForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Person>::build().form_error(errors.to_string()));
    }

    let mut person = existing(pg_pool.get_ref(), path.into_inner().0).await?;
    form.into_inner().update(&mut person);
    save(pg_pool.get_ref(), person).await
}

#[tracing::instrument(name = "Partially update person.", skip(req, pg_pool))]
#[patch("/{id}")]
pub async fn partial(
    req: HttpRequest,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::PersonPatch>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Person>::build().form_error(errors.to_string()));
    }

    let mut person = existing(pg_pool.get_ref(), path.into_inner().0).await?;
    form.into_inner().update(&mut person);
    save(pg_pool.get_ref(), person).await
}
