#![allow(dead_code)]

use events_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::{run_sqlite_migrations, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub struct AuthHeaders {
    pub organizer_id: String,
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
            jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
            auth_issuer: "test-issuer".to_string(),
            log_dir: std::env::temp_dir().to_string_lossy().to_string(),
        };

        let state = Arc::new(
            AppState::assemble(config, sqlite_repositories(pool.clone()))
                .expect("Failed to assemble app state"),
        );

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request without credentials.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Sends a request with the session cookie and CSRF header of `auth`.
    pub async fn send_authed(&self, auth: &AuthHeaders, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);

        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn signup(&self, username: &str, password: &str) -> String {
        let response = self.send(
            "POST",
            "/api/v1/organizers",
            Some(json!({ "username": username, "password": password })),
        ).await;

        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        body["organizerId"].as_str().expect("No organizerId in body").to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let response = self.send(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": username, "password": password })),
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body = parse_body(response).await;
        let csrf_token = body["csrfToken"].as_str().expect("No csrfToken in body").to_string();
        let organizer_id = body["organizer"]["id"].as_str().expect("No organizer id in body").to_string();

        AuthHeaders {
            organizer_id,
            access_token,
            csrf_token,
        }
    }

    /// Signs up a fresh organizer and returns its session.
    pub async fn organizer(&self) -> AuthHeaders {
        let username = format!("org-{}", &Uuid::new_v4().simple().to_string()[..12]);
        self.signup(&username, "correct-horse-battery").await;
        self.login(&username, "correct-horse-battery").await
    }

    pub async fn create_event(&self, auth: &AuthHeaders, status: &str) -> Value {
        let response = self.send_authed(auth, "POST", "/api/v1/events", Some(json!({
            "title": "Launch Party",
            "date": "2030-06-01",
            "time": "19:30",
            "location": "Rooftop",
            "bio": "Members only",
            "agenda": "Drinks, then demos",
            "qa": "Bring a friend",
            "status": status,
        }))).await;

        if !response.status().is_success() {
            panic!("Event creation failed in test helper: status {}", response.status());
        }

        parse_body(response).await
    }

    pub async fn create_invitee(&self, auth: &AuthHeaders, event_id: &str, email: &str) -> Value {
        let response = self.send_authed(
            auth,
            "POST",
            &format!("/api/v1/events/{}/invitees", event_id),
            Some(json!({ "email": email })),
        ).await;

        if !response.status().is_success() {
            panic!("Invitee creation failed in test helper: status {}", response.status());
        }

        parse_body(response).await
    }

    pub async fn verify(&self, event_id: &str, body: Value) -> Response {
        self.send("POST", &format!("/api/v1/events/{}/verify-access", event_id), Some(body)).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
