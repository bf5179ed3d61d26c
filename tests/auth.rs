mod common;

use serde_json::{json, Value};

async fn post(app: &common::TestApp, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
    let mut request = reqwest::Client::new().post(app.url(path)).json(&body);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    request.send().await.expect("Failed to execute request.")
}

async fn register(app: &common::TestApp, username: &str) -> Value {
    let response = post(
        app,
        "/api/auth/register",
        None,
        json!({
            "email": format!("{}@example.com", username),
            "username": username,
            "password": "password123",
            "password_confirm": "password123",
            "first_name": "Ann"
        }),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    response.json().await.unwrap()
}

#[tokio::test]
async fn register_returns_tokens_and_profile() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let body = register(&app, "ann").await;
    let item = &body["item"];
    assert_eq!(item["user"]["email"], "ann@example.com");
    assert_eq!(item["user"]["full_name"], "Ann");
    assert!(item["user"]["preferences"]["email_notifications"].as_bool().unwrap());
    assert!(item["access"].as_str().is_some());
    assert!(item["refresh"].as_str().is_some());
    assert!(item["user"].get("password_hash").is_none());

    let duplicate = post(
        &app,
        "/api/auth/register",
        None,
        json!({
            "email": "other@example.com",
            "username": "ann",
            "password": "password123",
            "password_confirm": "password123"
        }),
    )
    .await;
    assert_eq!(400, duplicate.status().as_u16());
    let body: Value = duplicate.json().await.unwrap();
    assert_eq!(body["message"], "A user with that username already exists");
}

#[tokio::test]
async fn register_rejects_mismatched_passwords() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let response = post(
        &app,
        "/api/auth/register",
        None,
        json!({
            "email": "bob@example.com",
            "username": "bob",
            "password": "password123",
            "password_confirm": "password321"
        }),
    )
    .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(0, app.count("users").await);
}

#[tokio::test]
async fn login_checks_credentials() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    register(&app, "ann").await;

    let wrong = post(&app, "/api/auth/login", None, json!({ "email": "ann@example.com", "password": "nope" })).await;
    assert_eq!(400, wrong.status().as_u16());

    let response = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "ANN@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(!body["item"]["user"]["last_login"].is_null());
}

#[tokio::test]
async fn refresh_and_logout() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let body = register(&app, "ann").await;
    let access = body["item"]["access"].as_str().unwrap();
    let refresh = body["item"]["refresh"].as_str().unwrap();

    let refreshed = post(&app, "/api/auth/refresh", None, json!({ "refresh": refresh })).await;
    assert_eq!(200, refreshed.status().as_u16());

    // an access token is not a refresh token
    let wrong_type = post(&app, "/api/auth/refresh", None, json!({ "refresh": access })).await;
    assert_eq!(401, wrong_type.status().as_u16());

    let anonymous = post(&app, "/api/auth/logout", None, json!({ "refresh": refresh })).await;
    assert_eq!(401, anonymous.status().as_u16());

    let logout = post(&app, "/api/auth/logout", Some(access), json!({ "refresh": refresh })).await;
    assert_eq!(200, logout.status().as_u16());

    let revoked = post(&app, "/api/auth/refresh", None, json!({ "refresh": refresh })).await;
    assert_eq!(401, revoked.status().as_u16());
}

#[tokio::test]
async fn profile_and_preferences() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let body = register(&app, "ann").await;
    let access = body["item"]["access"].as_str().unwrap();
    let client = reqwest::Client::new();

    let anonymous = client.get(app.url("/api/auth/profile")).send().await.unwrap();
    assert_eq!(401, anonymous.status().as_u16());

    let profile: Value = client
        .patch(app.url("/api/auth/profile"))
        .bearer_auth(access)
        .json(&json!({ "last_name": "Lee", "bio": "Film buff" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["item"]["full_name"], "Ann Lee");
    assert_eq!(profile["item"]["bio"], "Film buff");

    let preferences: Value = client
        .put(app.url("/api/auth/preferences"))
        .bearer_auth(access)
        .json(&json!({ "favorite_genres": ["Drama", "Noir"], "email_notifications": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preferences["item"]["favorite_genres"], json!(["Drama", "Noir"]));
    assert_eq!(preferences["item"]["email_notifications"], false);

    let fetched: Value = client
        .get(app.url("/api/auth/preferences"))
        .bearer_auth(access)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["item"]["favorite_genres"], json!(["Drama", "Noir"]));
}

#[tokio::test]
async fn change_password() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let body = register(&app, "ann").await;
    let access = body["item"]["access"].as_str().unwrap();

    let wrong_old = post(
        &app,
        "/api/auth/change-password",
        Some(access),
        json!({ "old_password": "bad", "new_password": "newpassword1", "new_password_confirm": "newpassword1" }),
    )
    .await;
    assert_eq!(400, wrong_old.status().as_u16());

    let changed = post(
        &app,
        "/api/auth/change-password",
        Some(access),
        json!({ "old_password": "password123", "new_password": "newpassword1", "new_password_confirm": "newpassword1" }),
    )
    .await;
    assert_eq!(200, changed.status().as_u16());

    let old_login = post(&app, "/api/auth/login", None, json!({ "email": "ann@example.com", "password": "password123" })).await;
    assert_eq!(400, old_login.status().as_u16());
    let new_login = post(&app, "/api/auth/login", None, json!({ "email": "ann@example.com", "password": "newpassword1" })).await;
    assert_eq!(200, new_login.status().as_u16());
}
