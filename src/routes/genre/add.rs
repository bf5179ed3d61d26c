use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{post, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Add genre.", skip(req, pg_pool))]
#[post("")]
pub async fn add(
    req: HttpRequest,
    form: web::Json<forms::GenreForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::Genre>::build().form_error(errors.to_string()));
    }

    db::genre::insert(pg_pool.get_ref(), form.into_inner().into())
        .await
        .map_err(|err| crate::routes::write_error(err, "Genre"))
        .map(|genre| {
            JsonResponse::build()
                .set_id(genre.id)
                .set_item(views::Genre::from(genre))
                .created("Genre created")
        })
}
