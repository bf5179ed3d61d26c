mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn sync_imports_movie_with_relations() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;

    let response = app.sync(&token, 603).await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let item = &body["item"];
    assert_eq!(item["title"], "The Matrix");
    assert_eq!(item["tmdb_id"], 603);
    assert_eq!(item["imdb_id"], "tt0000603");
    assert_eq!(item["status"], "released");
    assert_eq!(item["release_date"], "1999-03-30");
    assert_eq!(item["poster_url"], "https://image.tmdb.org/t/p/w500/poster.jpg");
    assert_eq!(item["trailer_url"], "https://www.youtube.com/watch?v=abc123");
    assert_eq!(item["director"]["name"], "Lana Wachowski");
    assert_eq!(item["genre_list"], json!(["Action"]));
    assert_eq!(item["cast"][0]["character_name"], "Neo");

    assert_eq!(1, app.count("movies").await);
    assert_eq!(1, app.count("genres").await);
    assert_eq!(1, app.count("production_companies").await);
    assert_eq!(1, app.count("movie_cast").await);
    // the gaffer is not an allowed crew job
    assert_eq!(1, app.count("movie_crew").await);
    assert_eq!(2, app.count("people").await);
}

#[tokio::test]
async fn second_sync_reports_existing_movie() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;

    let first: Value = app.sync(&token, 603).await.json().await.unwrap();
    let response = app.sync(&token, 603).await;
    assert_eq!(200, response.status().as_u16());

    let second: Value = response.json().await.unwrap();
    assert_eq!(second["message"], "Movie already exists");
    assert_eq!(first["item"]["id"], second["item"]["id"]);

    assert_eq!(1, app.count("movies").await);
    assert_eq!(1, app.count("genres").await);
    assert_eq!(2, app.count("people").await);
    assert_eq!(1, app.count("movie_cast").await);
}

#[tokio::test]
async fn failing_crew_write_leaves_nothing_behind() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;

    // crew is written last; make that write fail
    sqlx::query("ALTER TABLE movie_crew ADD CONSTRAINT movie_crew_rejects_all CHECK (false)")
        .execute(&app.db_pool)
        .await
        .unwrap();
    app.mock_movie(common::movie_payload(604, "The Matrix Reloaded")).await;

    let response = app.sync(&token, 604).await;
    assert_eq!(500, response.status().as_u16());

    assert_eq!(0, app.count("movies").await);
    assert_eq!(0, app.count("genres").await);
    assert_eq!(0, app.count("production_companies").await);
    assert_eq!(0, app.count("people").await);
    assert_eq!(0, app.count("movie_cast").await);
}

#[tokio::test]
async fn cast_is_capped_at_twenty() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;

    let cast: Vec<Value> = (0..25)
        .map(|n| json!({ "id": 1000 + n, "name": format!("Actor {}", n), "character": "Extra", "order": n }))
        .collect();
    let mut payload = common::movie_payload(605, "Crowded");
    payload["credits"]["cast"] = Value::Array(cast);
    payload["credits"]["crew"] = json!([]);
    app.mock_movie(payload).await;

    assert_eq!(201, app.sync(&token, 605).await.status().as_u16());
    assert_eq!(20, app.count("movie_cast").await);

    let max_order: Option<i32> = sqlx::query_scalar("SELECT MAX(cast_order) FROM movie_cast")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(Some(19), max_order);
}

#[tokio::test]
async fn unknown_remote_movie_is_not_found() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;

    let response = app.sync(&token, 999_999).await;
    assert_eq!(404, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Movie with TMDB ID 999999 not found");
    assert_eq!(0, app.count("movies").await);
}

#[tokio::test]
async fn missing_tmdb_id_is_rejected() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;

    let response = reqwest::Client::new()
        .post(app.url("/api/movies/sync_from_tmdb"))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn sync_requires_admin() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;

    let anonymous = reqwest::Client::new()
        .post(app.url("/api/movies/sync_from_tmdb"))
        .json(&json!({ "tmdb_id": 603 }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, anonymous.status().as_u16());

    let (_, token) = app.create_user("viewer", false).await;
    assert_eq!(403, app.sync(&token, 603).await.status().as_u16());
    assert_eq!(0, app.count("movies").await);
}

#[tokio::test]
async fn concurrent_syncs_share_related_rows() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;
    app.mock_movie(common::movie_payload(604, "The Matrix Reloaded")).await;

    let (first, second) = futures::join!(app.sync(&token, 603), app.sync(&token, 604));
    assert_eq!(201, first.status().as_u16());
    assert_eq!(201, second.status().as_u16());

    assert_eq!(2, app.count("movies").await);
    assert_eq!(1, app.count("genres").await);
    assert_eq!(1, app.count("production_companies").await);
    assert_eq!(2, app.count("people").await);
    assert_eq!(2, app.count("movie_cast").await);
}

#[tokio::test]
async fn concurrent_syncs_with_reversed_relations_both_succeed() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;

    let genres = json!([{ "id": 28, "name": "Action" }, { "id": 18, "name": "Drama" }, { "id": 878, "name": "Science Fiction" }]);
    let companies = json!([
        { "id": 79, "name": "Village Roadshow Pictures", "logo_path": "/v.png" },
        { "id": 174, "name": "Warner Bros. Pictures", "logo_path": "/w.png" }
    ]);
    let cast: Vec<Value> = (0..10)
        .map(|n| json!({ "id": 2000 + n, "name": format!("Actor {}", n), "character": "Agent", "order": n }))
        .collect();

    let mut forward = common::movie_payload(603, "The Matrix");
    forward["genres"] = genres.clone();
    forward["production_companies"] = companies.clone();
    forward["credits"]["cast"] = Value::Array(cast.clone());

    let reverse_list = |value: &Value| {
        let mut items = value.as_array().unwrap().clone();
        items.reverse();
        Value::Array(items)
    };
    let mut backward = common::movie_payload(604, "The Matrix Reloaded");
    backward["genres"] = reverse_list(&genres);
    backward["production_companies"] = reverse_list(&companies);
    backward["credits"]["cast"] = reverse_list(&Value::Array(cast));

    app.mock_movie(forward).await;
    app.mock_movie(backward).await;

    let (first, second) = futures::join!(app.sync(&token, 603), app.sync(&token, 604));
    assert_eq!(201, first.status().as_u16());
    assert_eq!(201, second.status().as_u16());

    assert_eq!(2, app.count("movies").await);
    assert_eq!(3, app.count("genres").await);
    assert_eq!(2, app.count("production_companies").await);
    assert_eq!(11, app.count("people").await);
    assert_eq!(20, app.count("movie_cast").await);
    assert_eq!(6, app.count("movie_genres").await);
}

#[tokio::test]
async fn concurrent_syncs_of_one_movie_create_it_once() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;

    let (first, second) = futures::join!(app.sync(&token, 603), app.sync(&token, 603));
    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort();

    assert_eq!(vec![200, 201], statuses);
    assert_eq!(1, app.count("movies").await);
    assert_eq!(1, app.count("movie_cast").await);
}

#[tokio::test]
async fn genre_list_sync_is_idempotent() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/genre/movie/list"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "Action" }, { "id": 18, "name": "Drama" }]
        })))
        .mount(&app.tmdb)
        .await;

    for _ in 0..2 {
        let response = reqwest::Client::new()
            .post(app.url("/api/movies/sync_genres_from_tmdb"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        assert_eq!(2, body["list"].as_array().unwrap().len());
    }

    assert_eq!(2, app.count("genres").await);
    let description: String = sqlx::query_scalar("SELECT description FROM genres WHERE name = 'Drama'")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!("Genre: Drama", description);
}
