use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List people.", skip(pg_pool))]
#[get("")]
pub async fn list(
    filter: web::Query<forms::PersonFilter>,
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::person::list(pg_pool.get_ref(), &filter, &params)
        .await
        .map_err(|err| JsonResponse::<views::Person>::build().internal_server_error(err))
        .map(|(people, count)| {
            JsonResponse::build()
                .set_list(people.into_iter().map(views::Person::from).collect())
                .set_meta(params.meta(count))
                .ok("OK")
        })
}

#[tracing::instrument(name = "Get person.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(Uuid,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let pool = pg_pool.get_ref();

    let person = db::person::fetch(pool, id)
        .await
        .map_err(|err| JsonResponse::<views::PersonDetail>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<views::PersonDetail>::build().not_found("Person not found"))?;

    let (cast_roles, crew_roles) = futures::try_join!(
        db::person::cast_roles(pool, id),
        db::person::crew_roles(pool, id)
    )
    .map_err(|err| JsonResponse::<views::PersonDetail>::build().internal_server_error(err))?;

    let detail = views::PersonDetail {
        person: views::Person::from(person),
        cast_roles: cast_roles.into_iter().map(views::CastRole::from).collect(),
        crew_roles: crew_roles.into_iter().map(views::CrewRole::from).collect(),
    };

    Ok(JsonResponse::build().set_item(detail).ok("OK"))
}
