use crate::configuration::Settings;
use crate::connectors;
use crate::helpers;
use crate::middleware;
use crate::routes;
use actix_cors::Cors;
use actix_web::{dev::Server, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let tmdb_connector = connectors::init_tmdb(&settings.tmdb);

    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(helpers::json_error_handler);
    let query_config = web::QueryConfig::default().error_handler(helpers::query_error_handler);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::authentication::Manager::new())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .service(routes::auth::register::register)
                            .service(routes::auth::login::login)
                            .service(routes::auth::logout::logout)
                            .service(routes::auth::refresh::refresh)
                            .service(routes::auth::profile::item)
                            .service(routes::auth::profile::update)
                            .service(routes::auth::profile::partial)
                            .service(routes::auth::preferences::item)
                            .service(routes::auth::preferences::update)
                            .service(routes::auth::preferences::partial)
                            .service(routes::auth::password::change),
                    )
                    .service(
                        // static paths go before "/{id}"
                        web::scope("/movies")
                            .service(routes::movie::get::list)
                            .service(routes::movie::get::featured)
                            .service(routes::movie::get::popular)
                            .service(routes::movie::get::top_rated)
                            .service(routes::movie::search::search)
                            .service(routes::movie::search::tmdb_search)
                            .service(routes::movie::sync::sync_from_tmdb)
                            .service(routes::movie::sync::sync_genres_from_tmdb)
                            .service(routes::movie::add::add)
                            .service(routes::movie::get::item)
                            .service(routes::movie::update::item)
                            .service(routes::movie::update::partial)
                            .service(routes::movie::delete::item),
                    )
                    .service(
                        web::scope("/genres")
                            .service(routes::genre::get::list)
                            .service(routes::genre::add::add)
                            .service(routes::genre::get::item)
                            .service(routes::genre::update::item)
                            .service(routes::genre::update::partial)
                            .service(routes::genre::delete::item),
                    )
                    .service(
                        web::scope("/production-companies")
                            .service(routes::company::get::list)
                            .service(routes::company::add::add)
                            .service(routes::company::get::item)
                            .service(routes::company::update::item)
                            .service(routes::company::update::partial)
                            .service(routes::company::delete::item),
                    )
                    .service(
                        web::scope("/people")
                            .service(routes::person::get::list)
                            .service(routes::person::add::add)
                            .service(routes::person::get::item)
                            .service(routes::person::update::item)
                            .service(routes::person::update::partial)
                            .service(routes::person::delete::item),
                    ),
            )
            .app_data(json_config.clone())
            .app_data(query_config.clone())
            .app_data(pg_pool.clone())
            .app_data(tmdb_connector.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
