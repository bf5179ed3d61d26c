#![allow(dead_code)]

use chrono::Utc;
use movie_catalog::configuration::{get_configuration, DatabaseSettings, Settings};
use movie_catalog::helpers::jwt::{self, TokenType};
use movie_catalog::{db, helpers, models};
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub tmdb: MockServer,
    pub settings: Settings,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Stores a user straight in the database and returns it with an access token.
    pub async fn create_user(&self, username: &str, is_admin: bool) -> (models::User, String) {
        let user = models::User {
            id: uuid::Uuid::new_v4(),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            password_hash: helpers::password::hash_password("password123").unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            is_admin,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
            profile_image: None,
            bio: String::new(),
        };
        let (user, _) = db::user::insert(&self.db_pool, user).await.unwrap();
        let token = jwt::issue_token(&self.settings.jwt, user.id, TokenType::Access).unwrap();

        (user, token)
    }

    pub async fn admin_token(&self) -> String {
        self.create_user("admin", true).await.1
    }

    /// Serves `movie/{id}` from the mock TMDB.
    pub async fn mock_movie(&self, payload: Value) {
        let id = payload["id"].as_i64().unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/movie/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&self.tmdb)
            .await;
    }

    pub async fn sync(&self, token: &str, tmdb_id: i32) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url("/api/movies/sync_from_tmdb"))
            .bearer_auth(token)
            .json(&json!({ "tmdb_id": tmdb_id }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.db_pool)
            .await
            .unwrap()
    }
}

/// Spawns the server against a fresh database and a mock TMDB.
/// `None` when PostgreSQL is not reachable.
pub async fn spawn_app() -> Option<TestApp> {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    let tmdb = MockServer::start().await;

    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    configuration.tmdb.enabled = true;
    configuration.tmdb.base_url = tmdb.uri();
    configuration.tmdb.access_token = "test-token".to_string();
    configuration.tmdb.timeout_secs = 2;

    let connection_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = movie_catalog::startup::run(listener, connection_pool.clone(), configuration.clone())
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    Some(TestApp {
        address,
        db_pool: connection_pool,
        tmdb,
        settings: configuration,
    })
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}

/// TMDB movie detail payload with one genre, one company, one actor and a director.
pub fn movie_payload(id: i32, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_title": title,
        "overview": "A hacker learns the truth.",
        "tagline": "Welcome to the Real World.",
        "release_date": "1999-03-30",
        "runtime": 136,
        "budget": 63000000,
        "revenue": 463517383,
        "status": "Released",
        "adult": false,
        "popularity": 85.5,
        "vote_average": 8.2,
        "vote_count": 24000,
        "poster_path": "/poster.jpg",
        "backdrop_path": "/backdrop.jpg",
        "external_ids": { "imdb_id": format!("tt{:07}", id) },
        "genres": [{ "id": 28, "name": "Action" }],
        "production_companies": [
            { "id": 79, "name": "Village Roadshow Pictures", "logo_path": "/logo.png", "origin_country": "US" }
        ],
        "credits": {
            "cast": [
                { "id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0, "profile_path": "/keanu.jpg" }
            ],
            "crew": [
                { "id": 9340, "name": "Lana Wachowski", "job": "Director", "department": "Directing" },
                { "id": 1091, "name": "Bill Pope", "job": "Gaffer", "department": "Lighting" }
            ]
        },
        "videos": { "results": [{ "site": "YouTube", "type": "Trailer", "key": "abc123" }] }
    })
}
