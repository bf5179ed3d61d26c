mod common;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mock_search(app: &common::TestApp, ids: &[i32]) {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "title": format!("Matrix {}", id), "release_date": "1999-03-30" }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": results,
            "total_pages": 1,
            "total_results": ids.len()
        })))
        .mount(&app.tmdb)
        .await;
}

async fn add_movie(app: &common::TestApp, token: &str, title: &str) {
    let response = reqwest::Client::new()
        .post(app.url("/api/movies"))
        .bearer_auth(token)
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert_eq!(201, response.status().as_u16());
}

async fn search(app: &common::TestApp, query: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(app.url(&format!("/api/movies/search?{}", query)))
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
async fn query_is_required() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    assert_eq!(400, search(&app, "").await.status().as_u16());
    assert_eq!(400, search(&app, "q=%20%20").await.status().as_u16());
}

#[tokio::test]
async fn empty_catalog_imports_remote_hits() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    mock_search(&app, &[603, 604]).await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;
    app.mock_movie(common::movie_payload(604, "The Matrix Reloaded")).await;

    let response = search(&app, "q=matrix").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let stats = &body["item"]["search_stats"];
    assert_eq!(stats["local_count"], 0);
    assert_eq!(stats["tmdb_count"], 2);
    assert_eq!(stats["synced_count"], 2);
    assert_eq!(stats["total_count"], 2);
    assert_eq!(2, body["item"]["results"].as_array().unwrap().len());
    assert_eq!(2, app.count("movies").await);
}

#[tokio::test]
async fn stored_remote_hits_are_not_imported_again() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    let response = reqwest::Client::new()
        .post(app.url("/api/movies"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Heat", "tmdb_id": 604 }))
        .send()
        .await
        .unwrap();
    assert_eq!(201, response.status().as_u16());

    mock_search(&app, &[603, 604]).await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;
    app.mock_movie(common::movie_payload(604, "The Matrix Reloaded")).await;

    let body: Value = search(&app, "q=matrix").await.json().await.unwrap();
    let stats = &body["item"]["search_stats"];
    assert_eq!(stats["local_count"], 0);
    assert_eq!(stats["tmdb_count"], 2);
    assert_eq!(stats["synced_count"], 1);
    assert_eq!(2, app.count("movies").await);

    let requested: Vec<String> = app
        .tmdb
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert!(requested.contains(&"/movie/603".to_string()));
    assert!(!requested.contains(&"/movie/604".to_string()));
}

#[tokio::test]
async fn local_matches_skip_importing() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    add_movie(&app, &token, "The Matrix").await;
    mock_search(&app, &[603]).await;
    app.mock_movie(common::movie_payload(603, "The Matrix")).await;

    let body: Value = search(&app, "q=matrix").await.json().await.unwrap();
    let stats = &body["item"]["search_stats"];
    assert_eq!(stats["local_count"], 1);
    assert_eq!(stats["tmdb_count"], 1);
    assert_eq!(stats["synced_count"], 0);
    assert_eq!(1, app.count("movies").await);
}

#[tokio::test]
async fn remote_outage_still_answers_locally() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    add_movie(&app, &token, "The Matrix").await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.tmdb)
        .await;

    let response = search(&app, "q=matrix").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["item"]["search_stats"]["local_count"], 1);
    assert_eq!(body["item"]["search_stats"]["tmdb_count"], 0);
}

#[tokio::test]
async fn local_only_search_is_paginated() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let token = app.admin_token().await;
    add_movie(&app, &token, "The Matrix").await;
    add_movie(&app, &token, "The Matrix Reloaded").await;
    add_movie(&app, &token, "Heat").await;

    let response = search(&app, "q=matrix&include_tmdb=false&page_size=1").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(1, body["item"]["results"].as_array().unwrap().len());
    assert_eq!(body["meta"]["count"], 2);
    assert_eq!(body["meta"]["total_pages"], 2);
    assert_eq!(0, app.tmdb.received_requests().await.unwrap().len());
}

#[tokio::test]
async fn tmdb_search_passes_the_page_through() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    mock_search(&app, &[603, 604, 605]).await;

    let response = reqwest::Client::new()
        .get(app.url("/api/movies/tmdb_search?q=matrix"))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(3, body["item"]["results"].as_array().unwrap().len());
    assert_eq!(0, app.count("movies").await);

    let missing = reqwest::Client::new()
        .get(app.url("/api/movies/tmdb_search?q=nothing"))
        .send()
        .await
        .unwrap();
    assert_eq!(404, missing.status().as_u16());
}
