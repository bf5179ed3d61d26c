//! External service connectors.
//!
//! Remote services are reached only through a trait object injected as
//! `web::Data<Arc<dyn Trait>>`, so handlers and services never depend on the
//! HTTP client and tests can swap in a wiremock-backed instance.

pub mod errors;
pub mod tmdb;

pub use errors::ConnectorError;
pub use tmdb::{
    CastRecord, CompanyRecord, CrewRecord, GenreRecord, ImageSize, ImageUrlBuilder, MovieRecord,
    MovieSummary, PersonRecord, SearchPage, TmdbConnector,
};

pub use tmdb::init as init_tmdb;
