//! Integration test support for Recipe Finder.
//!
//! The tests drive the real `reqwest`-based clients and the site router
//! against in-process `axum` servers bound to `127.0.0.1:0`; nothing here
//! needs network access or a running database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p recipe-finder-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;

use recipe_finder_core::UserId;
use recipe_finder_web::config::{ApiConfig, AppConfig, GoogleConfig, parse_base_url};
use recipe_finder_web::models::{AuthSession, SessionCredential, SessionUser, StoredSession};

/// Cookie header the fake visitor sends.
pub const TEST_COOKIE: &str = "rf_session=test-session-id";

/// Serve `router` on an ephemeral local port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });
    addr
}

/// A request seen by the fake upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_default()
    }
}

/// Fake upstream standing in for the recipe REST API, Google and the asset
/// bucket. Every request is recorded.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeUpstream {
    /// Start the fake upstream and return it with its base URL.
    pub async fn start() -> (Self, String) {
        let fake = Self::default();
        let router = Router::new().fallback(respond).with_state(fake.clone());
        let addr = spawn(router).await;
        (fake, format!("http://{addr}"))
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request to `path`.
    #[must_use]
    pub fn last(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

/// Raw recipe records as the REST API returns them.
#[must_use]
pub fn sample_recipes() -> serde_json::Value {
    json!([
        {
            "_id": "r1",
            "owner": {"_id": "u1", "name": "Ada", "image": "ada.png", "email": "ada@example.com"},
            "likedBy": [{"_id": "u2", "name": "Bo", "image": null, "email": "bo@example.com"}],
            "createdAt": "2024-03-05T10:00:00Z",
            "name": "Dal",
            "imgLink": "https://smart-recipe-generator.s3.amazonaws.com/dal.png"
        },
        {
            "_id": "r2",
            "owner": {"_id": "u2", "name": "Bo", "image": null},
            "likedBy": [],
            "name": "Kimchi"
        }
    ])
}

async fn respond(
    State(fake): State<FakeUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    fake.requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Recorded {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers.clone(),
            body: body.clone(),
        });

    match uri.path() {
        "/api/get-recipes" | "/api/profile" => axum::Json(sample_recipes()).into_response(),
        "/api/like-recipe" => axum::Json(json!({
            "_id": "r2",
            "owner": {"_id": "u2", "name": "Bo", "image": null},
            "likedBy": [{"_id": "u1", "name": "Ada", "image": "ada.png", "email": "ada@example.com"}],
            "name": "Kimchi"
        }))
        .into_response(),
        "/api/delete-recipe" | "/api/empty" => StatusCode::OK.into_response(),
        "/api/echo" => axum::Json(json!({"ok": true})).into_response(),
        "/api/broken" => (StatusCode::OK, "{not json").into_response(),
        "/api/fail" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "/audio/clip.mp3" => (
            [(header::CONTENT_TYPE, "audio/mpeg")],
            Body::from(vec![0x49_u8, 0x44, 0x33, 0x04]),
        )
            .into_response(),
        "/audio/long.mp3" => (
            [(header::CONTENT_TYPE, "audio/mpeg")],
            Body::from(vec![0_u8; 64]),
        )
            .into_response(),
        "/audio/slow.mp3" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::OK.into_response()
        }
        "/token" => {
            if String::from_utf8_lossy(&body).contains("code=good-code") {
                axum::Json(json!({
                    "access_token": "ya29.token",
                    "id_token": "header.payload.signature",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }))
                .into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({
                        "error": "invalid_grant",
                        "error_description": "Bad Request"
                    })),
                )
                    .into_response()
            }
        }
        "/userinfo" => {
            let bearer = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            if bearer == Some("Bearer ya29.token") {
                axum::Json(json!({
                    "sub": "1098765",
                    "name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "email_verified": true,
                    "picture": "https://lh3.googleusercontent.com/a/ada"
                }))
                .into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Site configuration pointing the REST API at `api_base`.
///
/// # Panics
///
/// Panics if `api_base` is not a valid URL.
#[must_use]
pub fn test_config(api_base: &str) -> AppConfig {
    AppConfig {
        database_url: SecretString::from("postgres://localhost/recipe_finder_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        trust_proxy_headers: false,
        session_secret: SecretString::from(
            "k3Jd9sLq0PzX7vNw2RtY5uBm8HcA1eFg4iKo6jMn3bVc9xZl7pQr2sTu5wYy8aDf",
        ),
        api: ApiConfig {
            base_url: parse_base_url(api_base).expect("valid API base URL"),
        },
        google: GoogleConfig {
            client_id: "test-client.apps.googleusercontent.com".to_string(),
            client_secret: SecretString::from("test-client-secret"),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A signed-in visitor with id `user_id`.
#[must_use]
pub fn auth_session(user_id: &str) -> AuthSession {
    let stored = StoredSession::new(
        SessionUser {
            id: UserId::new(user_id),
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            image: None,
        },
        Utc::now(),
    );
    AuthSession {
        user: stored.user,
        expires_at: stored.expires_at,
        credential: SessionCredential::new(TEST_COOKIE),
    }
}

/// An HTTP client that does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build test client")
}
