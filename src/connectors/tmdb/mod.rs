mod client;
mod disabled;
mod images;
mod types;

use crate::configuration::TmdbSettings;
use crate::connectors::errors::ConnectorError;
use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;

pub use client::TmdbClient;
pub use disabled::DisabledTmdbConnector;
pub use images::{ImageSize, ImageUrlBuilder};
pub use types::*;

/// Read-only access to the TMDB metadata API.
#[async_trait]
pub trait TmdbConnector: Send + Sync {
    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, ConnectorError>;
    async fn fetch_movie(&self, tmdb_id: i32) -> Result<MovieRecord, ConnectorError>;
    async fn fetch_person(&self, tmdb_id: i32) -> Result<PersonRecord, ConnectorError>;
    async fn fetch_genre_list(&self) -> Result<Vec<GenreRecord>, ConnectorError>;
    async fn fetch_company(&self, company_id: i32) -> Result<CompanyRecord, ConnectorError>;
    fn images(&self) -> &ImageUrlBuilder;
}

/// Initialize the TMDB connector from app settings
pub fn init(settings: &TmdbSettings) -> web::Data<Arc<dyn TmdbConnector>> {
    let images = ImageUrlBuilder::from_settings(settings);
    let connector: Arc<dyn TmdbConnector> = if settings.enabled {
        if settings.access_token.is_empty() && settings.api_key.is_empty() {
            tracing::warn!("TMDB credentials are empty, remote calls will be rejected");
        }

        match TmdbClient::new(settings) {
            Ok(client) => {
                tracing::info!("TMDB connector initialized ({})", settings.base_url);
                Arc::new(client)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to initialize TMDB connector, remote metadata disabled");
                Arc::new(DisabledTmdbConnector::new(images))
            }
        }
    } else {
        tracing::warn!("TMDB connector disabled");
        Arc::new(DisabledTmdbConnector::new(images))
    };

    web::Data::new(connector)
}
