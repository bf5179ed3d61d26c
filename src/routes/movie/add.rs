use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::middleware::authorization::require_admin;
use crate::views;
use actix_web::{post, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Add movie.", skip(req, pg_pool))]
#[post("")]
pub async fn add(
    req: HttpRequest,
    form: web::Json<forms::MovieForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    require_admin(&req)?;
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::MovieDetail>::build().form_error(errors.to_string()));
    }

    let (movie, relations) = form.into_inner().into_model();
    let movie = db::movie::insert(pg_pool.get_ref(), movie, &relations)
        .await
        .map_err(|err| crate::routes::write_error(err, "Movie"))?;

    super::load_detail(pg_pool.get_ref(), movie)
        .await
        .map_err(|err| JsonResponse::<views::MovieDetail>::build().internal_server_error(err))
        .map(|detail| {
            JsonResponse::build()
                .set_id(detail.movie.id)
                .set_item(detail)
                .created("Movie created")
        })
}
