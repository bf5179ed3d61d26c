use super::images::ImageUrlBuilder;
use super::types::{CompanyRecord, GenreRecord, MovieRecord, PersonRecord, SearchPage};
use super::TmdbConnector;
use crate::connectors::errors::ConnectorError;
use async_trait::async_trait;

/// Stand-in used when TMDB is switched off; every call is unavailable.
pub struct DisabledTmdbConnector {
    images: ImageUrlBuilder,
}

impl DisabledTmdbConnector {
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self { images }
    }

    fn unavailable<T>(&self) -> Result<T, ConnectorError> {
        Err(ConnectorError::Unavailable("TMDB connector is disabled".to_string()))
    }
}

#[async_trait]
impl TmdbConnector for DisabledTmdbConnector {
    async fn search_movies(&self, _query: &str, _page: u32) -> Result<SearchPage, ConnectorError> {
        self.unavailable()
    }

    async fn fetch_movie(&self, _tmdb_id: i32) -> Result<MovieRecord, ConnectorError> {
        self.unavailable()
    }

    async fn fetch_person(&self, _tmdb_id: i32) -> Result<PersonRecord, ConnectorError> {
        self.unavailable()
    }

    async fn fetch_genre_list(&self) -> Result<Vec<GenreRecord>, ConnectorError> {
        self.unavailable()
    }

    async fn fetch_company(&self, _company_id: i32) -> Result<CompanyRecord, ConnectorError> {
        self.unavailable()
    }

    fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }
}
