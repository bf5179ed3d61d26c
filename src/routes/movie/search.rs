use crate::connectors::{SearchPage, TmdbConnector};
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::services;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

const MISSING_QUERY: &str = "Search query parameter \"q\" is required.";

/// Local search; with `include_tmdb` and `sync_missing` (both default on)
/// TMDB is consulted and missing titles may be imported.
#[tracing::instrument(name = "Search movies.", skip(pg_pool, tmdb))]
#[get("/search")]
pub async fn search(
    query: web::Query<forms::SearchQuery>,
    params: web::Query<forms::ListParams>,
    pg_pool: web::Data<PgPool>,
    tmdb: web::Data<Arc<dyn TmdbConnector>>,
) -> Result<impl Responder> {
    let text = query
        .text()
        .ok_or_else(|| JsonResponse::<views::SearchResults>::build().bad_request(MISSING_QUERY))?;

    if !query.wants_remote() {
        let filter = forms::MovieFilter {
            search: Some(text.to_string()),
            ..Default::default()
        };
        let (movies, count) = db::movie::list(pg_pool.get_ref(), &filter, &params)
            .await
            .map_err(|err| JsonResponse::<views::SearchResults>::build().internal_server_error(err))?;
        let results = super::list_items(pg_pool.get_ref(), movies)
            .await
            .map_err(|err| JsonResponse::<views::SearchResults>::build().internal_server_error(err))?;

        let search_stats = views::SearchStats {
            local_count: results.len(),
            total_count: results.len(),
            ..Default::default()
        };
        return Ok(JsonResponse::build()
            .set_item(views::SearchResults {
                query: text.to_string(),
                results,
                search_stats,
            })
            .set_meta(params.meta(count))
            .ok("OK"));
    }

    let outcome = services::search::search(pg_pool.get_ref(), tmdb.get_ref().as_ref(), text, true)
        .await
        .map_err(|err| JsonResponse::<views::SearchResults>::build().internal_server_error(err))?;

    let search_stats = views::SearchStats {
        local_count: outcome.local.len(),
        tmdb_count: outcome.remote.len(),
        synced_count: outcome.synced.len(),
        total_count: outcome.local.len() + outcome.synced.len(),
    };
    let movies = outcome.local.into_iter().chain(outcome.synced).collect();
    let results = super::list_items(pg_pool.get_ref(), movies)
        .await
        .map_err(|err| JsonResponse::<views::SearchResults>::build().internal_server_error(err))?;

    Ok(JsonResponse::build()
        .set_item(views::SearchResults {
            query: text.to_string(),
            results,
            search_stats,
        })
        .ok("OK"))
}

/// Raw TMDB search page, nothing is imported.
#[tracing::instrument(name = "Search TMDB.", skip(tmdb))]
#[get("/tmdb_search")]
pub async fn tmdb_search(
    query: web::Query<forms::TmdbSearchQuery>,
    tmdb: web::Data<Arc<dyn TmdbConnector>>,
) -> Result<impl Responder> {
    let text = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| JsonResponse::<SearchPage>::build().bad_request(MISSING_QUERY))?;

    tmdb.search_movies(text, query.page.unwrap_or(1).max(1))
        .await
        .map(|page| JsonResponse::build().set_item(page).ok("OK"))
        .map_err(|err| {
            tracing::warn!(error = %err, "TMDB search failed");
            JsonResponse::<SearchPage>::build().not_found("No results from TMDB")
        })
}
