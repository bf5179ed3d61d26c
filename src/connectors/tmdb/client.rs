use super::images::ImageUrlBuilder;
use super::types::{CompanyRecord, GenreList, GenreRecord, MovieRecord, PersonRecord, SearchPage};
use super::TmdbConnector;
use crate::configuration::TmdbSettings;
use crate::connectors::errors::ConnectorError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::Instrument;

const MOVIE_APPENDS: &str = "credits,videos,keywords,external_ids";
const PERSON_APPENDS: &str = "movie_credits,external_ids";

pub struct TmdbClient {
    base_url: String,
    http_client: reqwest::Client,
    access_token: String,
    api_key: String,
    language: String,
    images: ImageUrlBuilder,
}

impl TmdbClient {
    pub fn new(settings: &TmdbSettings) -> Result<Self, ConnectorError> {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("movie-catalog/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ConnectorError::Unavailable(format!("HTTP client error: {}", err)))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token: settings.access_token.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            images: ImageUrlBuilder::from_settings(settings),
        })
    }

    /// Single GET against `endpoint`. Every failure is logged and returned as a
    /// [`ConnectorError`]; nothing is retried.
    async fn get<T>(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<T, ConnectorError>
    where
        T: DeserializeOwned,
    {
        let mut query = params;
        if !self.api_key.is_empty() {
            query.push(("api_key", self.api_key.clone()));
        }
        query.push(("language", self.language.clone()));

        let mut builder = self
            .http_client
            .get(format!("{}/{}", self.base_url, endpoint))
            .header("Accept", "application/json")
            .query(&query);
        if !self.access_token.is_empty() {
            builder = builder.bearer_auth(&self.access_token);
        }

        // the api key stays out of the logs
        let logged_query: Vec<String> = query
            .iter()
            .filter(|(key, _)| *key != "api_key")
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let logged_query = logged_query.join("&");

        let span = tracing::info_span!("tmdb_http_request", endpoint);
        let response = builder.send().instrument(span).await.map_err(|err| {
            tracing::error!(endpoint, query = %logged_query, "TMDB request failed: {}", err);
            ConnectorError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                endpoint,
                status = status.as_u16(),
                query = %logged_query,
                "TMDB answered with a non-success status"
            );
            return Err(ConnectorError::Unavailable(format!("TMDB status {}", status)));
        }

        let text = response.text().await.map_err(|err| {
            tracing::error!(endpoint, status = status.as_u16(), "Failed to read TMDB body: {}", err);
            ConnectorError::from(err)
        })?;

        let payload = serde_json::from_str::<Value>(&text).map_err(|err| {
            tracing::error!(endpoint, status = status.as_u16(), query = %logged_query, "TMDB body is not JSON: {}", err);
            ConnectorError::Unavailable(format!("invalid JSON body: {}", err))
        })?;

        serde_json::from_value::<T>(payload.clone()).map_err(|err| {
            tracing::error!(
                endpoint,
                status = status.as_u16(),
                query = %logged_query,
                payload_keys = ?payload_shape(&payload),
                "TMDB body lacks required fields: {}",
                err
            );
            ConnectorError::MalformedResponse(err.to_string())
        })
    }
}

fn payload_shape(payload: &Value) -> Vec<String> {
    match payload {
        Value::Object(map) => map.keys().cloned().collect(),
        other => vec![format!("<{}>", json_kind(other))],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl TmdbConnector for TmdbClient {
    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, ConnectorError> {
        self.get(
            "search/movie",
            vec![
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }

    async fn fetch_movie(&self, tmdb_id: i32) -> Result<MovieRecord, ConnectorError> {
        self.get(
            &format!("movie/{}", tmdb_id),
            vec![("append_to_response", MOVIE_APPENDS.to_string())],
        )
        .await
    }

    async fn fetch_person(&self, tmdb_id: i32) -> Result<PersonRecord, ConnectorError> {
        self.get(
            &format!("person/{}", tmdb_id),
            vec![("append_to_response", PERSON_APPENDS.to_string())],
        )
        .await
    }

    async fn fetch_genre_list(&self) -> Result<Vec<GenreRecord>, ConnectorError> {
        self.get::<GenreList>("genre/movie/list", vec![])
            .await
            .map(|list| list.genres)
    }

    async fn fetch_company(&self, company_id: i32) -> Result<CompanyRecord, ConnectorError> {
        self.get(&format!("company/{}", company_id), vec![]).await
    }

    fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> TmdbSettings {
        TmdbSettings {
            base_url,
            access_token: "token".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 1,
            ..TmdbSettings::default()
        }
    }

    #[tokio::test]
    async fn search_sends_auth_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "matrix"))
            .and(query_param("page", "1"))
            .and(query_param("include_adult", "false"))
            .and(query_param("api_key", "key"))
            .and(query_param("language", "en-US"))
            .and(header("Authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 603, "title": "The Matrix", "release_date": "1999-03-30"}],
                "total_pages": 1,
                "total_results": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();
        let page = client.search_movies("matrix", 1).await.unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 603);
        assert_eq!(page.results[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn movie_detail_requests_appended_resources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("append_to_response", "credits,videos,keywords,external_ids"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "title": "The Matrix",
                "credits": {"cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0}]}
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();
        let record = client.fetch_movie(603).await.unwrap();

        assert_eq!(record.credits.cast[0].character, "Neo");
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"status_code": 34})))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();
        let result = client.fetch_movie(1).await;

        assert!(matches!(result, Err(ConnectorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn missing_required_fields_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();
        let result = client.fetch_movie(2).await;

        assert!(matches!(result, Err(ConnectorError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn non_json_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();

        assert!(matches!(
            client.fetch_genre_list().await,
            Err(ConnectorError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/company/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 7, "name": "Slow"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = TmdbClient::new(&settings(server.uri())).unwrap();

        assert!(matches!(
            client.fetch_company(7).await,
            Err(ConnectorError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let client = TmdbClient::new(&settings("http://127.0.0.1:1".to_string())).unwrap();

        assert!(matches!(
            client.fetch_person(31).await,
            Err(ConnectorError::Unavailable(_))
        ));
    }
}
