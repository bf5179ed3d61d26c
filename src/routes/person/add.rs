use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{post, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Add person.", skip(req, pg_pool))]
#[post("")]
pub async fn add(
    req: HttpRequest,
    form: web::Json<forms::PersonForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Person>::build().form_error(errors.to_string()));
    }

    db::person::insert(pg_pool.get_ref(), form.into_inner().into())
        .await
        .map_err(|err| crate::routes::write_error(err, "Person"))
        .map(|person| {
            JsonResponse::build()
                .set_id(person.id)
                .set_item(views::Person::from(person))
                .created("Person created")
        })
}
