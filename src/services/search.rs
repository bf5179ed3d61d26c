//! Local search, optionally widened with TMDB results.

use crate::connectors::{MovieSummary, TmdbConnector};
use crate::db;
use crate::models;
use crate::services::sync::{self, SyncOutcome};
use sqlx::PgPool;

/// Local matches returned by the combined search.
pub const LOCAL_LIMIT: i64 = 10;
/// Remote hits returned for display.
pub const REMOTE_LIMIT: usize = 10;
/// Remote hits imported when nothing matched locally.
pub const MAX_AUTO_SYNC: usize = 5;

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub local: Vec<models::Movie>,
    pub remote: Vec<MovieSummary>,
    pub synced: Vec<models::Movie>,
}

/// TMDB ids to import: the top remote hits not yet in the catalog, and only
/// when the local search found nothing.
pub fn sync_candidates(local_count: usize, hits: &[MovieSummary], existing: &[i32]) -> Vec<i32> {
    if local_count > 0 {
        return vec![];
    }

    let mut candidates: Vec<i32> = Vec::with_capacity(MAX_AUTO_SYNC);
    for hit in hits.iter().take(MAX_AUTO_SYNC) {
        if !existing.contains(&hit.id) && !candidates.contains(&hit.id) {
            candidates.push(hit.id);
        }
    }
    candidates
}

#[tracing::instrument(name = "Combined movie search", skip(pool, tmdb))]
pub async fn search(
    pool: &PgPool,
    tmdb: &dyn TmdbConnector,
    query: &str,
    include_remote: bool,
) -> Result<SearchOutcome, String> {
    let local = db::movie::search_local(pool, query, LOCAL_LIMIT).await?;
    if !include_remote {
        return Ok(SearchOutcome {
            local,
            ..SearchOutcome::default()
        });
    }

    let remote: Vec<MovieSummary> = match tmdb.search_movies(query, 1).await {
        Ok(page) => page.results.into_iter().take(REMOTE_LIMIT).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "TMDB search failed, continuing with local results");
            vec![]
        }
    };

    let mut synced = vec![];
    if local.is_empty() && !remote.is_empty() {
        let top_ids: Vec<i32> = remote.iter().take(MAX_AUTO_SYNC).map(|hit| hit.id).collect();
        let existing = db::movie::existing_tmdb_ids(pool, &top_ids).await?;

        for tmdb_id in sync_candidates(local.len(), &remote, &existing) {
            match sync::sync_from_external_id(pool, tmdb, tmdb_id).await {
                Ok(SyncOutcome::Created(movie)) => synced.push(movie),
                Ok(SyncOutcome::AlreadyExists(_)) => {
                    tracing::debug!(tmdb_id, "Skipped movie already in catalog");
                }
                Err(err) => {
                    tracing::warn!(tmdb_id, error = %err, "Auto-sync of search hit failed");
                }
            }
        }
    }

    tracing::info!(
        local = local.len(),
        remote = remote.len(),
        synced = synced.len(),
        "Search completed"
    );

    Ok(SearchOutcome {
        local,
        remote,
        synced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hits(ids: &[i32]) -> Vec<MovieSummary> {
        ids.iter()
            .map(|id| serde_json::from_value(json!({"id": id, "title": format!("Movie {id}")})).unwrap())
            .collect()
    }

    #[test]
    fn local_matches_suppress_syncing() {
        assert!(sync_candidates(1, &hits(&[1, 2, 3]), &[]).is_empty());
    }

    #[test]
    fn empty_local_syncs_missing_hits() {
        assert_eq!(sync_candidates(0, &hits(&[1, 2, 3]), &[2]), vec![1, 3]);
    }

    #[test]
    fn syncing_is_capped() {
        let candidates = sync_candidates(0, &hits(&[1, 2, 3, 4, 5, 6, 7, 8]), &[]);
        assert_eq!(candidates, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn repeated_hits_sync_once() {
        assert_eq!(sync_candidates(0, &hits(&[4, 4, 5]), &[]), vec![4, 5]);
    }
}
