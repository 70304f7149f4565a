//! Shared fixtures for the HTTP tests: in-memory storage, fast bcrypt,
//! and helpers for driving the session cookie.

use std::time::Instant;

use actix_web::{cookie::Cookie, dev::ServiceResponse, web};

use crate::config::{AuthConfig, LinkConfig};
use crate::repositories::Repositories;
use crate::services::Services;
use crate::types::AppState;

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test_secret_key_32_bytes_long!!".to_string(),
        token_ttl_hours: 48,
        cookie_name: "token".to_string(),
        cookie_max_age_seconds: 3600,
        cookie_secure: false,
        bcrypt_cost: 4,
    }
}

pub fn link_config() -> LinkConfig {
    LinkConfig {
        public_base_url: "http://localhost:8000".to_string(),
        ttl_hours: 24,
        code_length: 7,
        max_code_attempts: 5,
        sweep_interval_seconds: 60,
    }
}

/// Fresh memory repositories and the services built on them
pub fn fixture() -> (Repositories, Services) {
    let repositories = Repositories::memory();
    let services = Services::new(&repositories, link_config(), auth_config());
    (repositories, services)
}

pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState {
        start_time: Instant::now(),
        db: None,
        version: "test".to_string(),
    })
}

/// The `token` cookie set by a response, if any
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "token")
        .map(|c| c.into_owned())
}

/// Initializes the full application over `services`
macro_rules! test_app {
    ($services:expr) => {
        actix_web::test::init_service(crate::app::build_app(
            $services,
            crate::test_support::state(),
            false,
            crate::telemetry::access_log_format(&crate::config::Environment::Testing),
        ))
        .await
    };
}

/// Registers a random user and returns their session cookie
macro_rules! login {
    ($app:expr) => {{
        use fake::Fake;

        // Suffixed so two logins in one test never collide
        let username = format!(
            "{}_{}",
            fake::faker::internet::en::Username().fake::<String>(),
            uuid::Uuid::new_v4().simple()
        );
        let password: String = fake::faker::internet::en::Password(8..20).fake();
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({ "username": username, "password": password }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert!(resp.status().is_success(), "register failed: {}", resp.status());
        crate::test_support::session_cookie(&resp).expect("session cookie")
    }};
}

pub(crate) use login;
pub(crate) use test_app;
