//! Shared helpers for driving the full router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use healthlog::auth::session::SessionSigner;
use healthlog::config::{AuthConfig, Config};
use healthlog::db;
use healthlog::routes;
use healthlog::state::{AppState, DbPool};

pub const TEST_SECRET: &str = "test-secret-key";

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let pool = db::create_pool(&dir.path().join("health.db")).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let config = Config {
        auth: AuthConfig {
            secret_key: Some(TEST_SECRET.to_string()),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
        ..Config::default()
    };
    let sessions = SessionSigner::from_config(&config.auth);

    let state = AppState {
        db: pool.clone(),
        config,
        sessions: Arc::new(sessions),
    };

    TestApp {
        router: routes::app(state),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Register and log in, returning the `name=value` session cookie.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let body = format!("username={}&password={}", username, password);
        self.post_form("/register", &body, None).await;

        let response = self.post_form("/login", &body, None).await;
        assert_eq!(response.status(), 303, "login failed for {}", username);
        session_cookie(&response).expect("login did not set a session cookie")
    }

    pub fn count(&self, sql: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }
}

/// The `name=value` pair of the first Set-Cookie header, if any.
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = set_cookie.split(';').next()?.trim();
    Some(pair.to_string())
}

pub fn location<B>(response: &Response<B>) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
