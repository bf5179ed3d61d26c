use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List genres.", skip(pg_pool))]
#[get("")]
pub async fn list(
    filter: web::Query<forms::GenreFilter>,
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::genre::list(pg_pool.get_ref(), &filter, &params)
        .await
        .map_err(|err| JsonResponse::<views::Genre>::build().internal_server_error(err))
        .map(|(genres, count)| {
            JsonResponse::build()
                .set_list(genres.into_iter().map(views::Genre::from).collect())
                .set_meta(params.meta(count))
                .ok("OK")
        })
}

#[tracing::instrument(name = "Get genre.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(Uuid,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();

    let genre = db::genre::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<views::GenreDetail>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::GenreDetail>::build().not_found("Genre not found"))?;

    let movies = db::genre::movies_of(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<views::GenreDetail>::build().internal_server_error(err))?;

    let detail = views::GenreDetail {
        genre: views::Genre {
            movie_count: Some(movies.len() as i64),
            ..views::Genre::from(genre)
        },
        movies,
    };

    Ok(JsonResponse::build().set_item(detail).ok("OK"))
}
