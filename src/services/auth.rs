use std::sync::Arc;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::Duration;
use log::{debug, info, warn};
use tokio::task;
use validator::Validate;

use crate::config::AuthConfig;
use crate::errors::{AppError, RepositoryError};
use crate::models::{AuthStatus, Credentials, User};
use crate::repositories::DynUserRepository;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::token::{Claims, TokenService};

type Result<T> = std::result::Result<T, AppError>;

/// Account registration, login and session tokens
pub struct AuthService {
    users: Arc<DynUserRepository>,
    tokens: TokenService,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<DynUserRepository>, config: AuthConfig) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours));
        Self {
            users,
            tokens,
            config,
        }
    }

    /// Creates the account and returns a session token for it
    pub async fn register(&self, credentials: Credentials) -> Result<String> {
        credentials.validate()?;

        if self
            .users
            .find_by_username(&credentials.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let cost = self.config.bcrypt_cost;
        let password = credentials.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = User::new(credentials.username, password_hash);
        match self.users.create(&user).await {
            Ok(_) => {}
            // Lost a race against a concurrent registration
            Err(RepositoryError::Conflict(_)) => {
                return Err(AppError::Conflict("User already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Registered user '{}' ({})", user.username, user.id);
        self.issue(&user)
    }

    /// Checks the password and returns a fresh session token
    pub async fn login(&self, credentials: Credentials) -> Result<String> {
        credentials.validate()?;

        let user = self
            .users
            .find_by_username(&credentials.username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let password = credentials.password;
        let hashed = user.password_hash.clone();
        let matches = task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !matches {
            info!("Rejected login for '{}': wrong password", user.username);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        info!("User '{}' logged in", user.username);
        self.issue(&user)
    }

    /// Decodes a session token. Missing or invalid tokens yield `None`.
    pub fn verify(&self, token: Option<&str>) -> Option<Claims> {
        let token = token?;
        match self.tokens.verify(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// Like `verify`, but the account must also still exist
    pub async fn status(&self, token: Option<&str>) -> AuthStatus {
        let Some(claims) = self.verify(token) else {
            return AuthStatus::anonymous();
        };

        match self.users.find_by_id(&claims.user_id).await {
            Ok(Some(user)) => AuthStatus {
                is_authenticated: true,
                user_id: Some(user.id),
                name: Some(user.username),
            },
            Ok(None) => AuthStatus::anonymous(),
            Err(e) => {
                warn!("Auth status lookup failed: {}", e);
                AuthStatus::anonymous()
            }
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(self.config.cookie_name.clone(), token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .max_age(CookieDuration::seconds(self.config.cookie_max_age_seconds))
            .finish()
    }

    /// A cookie that tells the browser to drop the session
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn issue(&self, user: &User) -> Result<String> {
        self.tokens
            .issue(user.id, &user.username)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use fake::faker::internet::en::{Password, Username};
    use fake::Fake;

    use super::*;
    use crate::repositories::{MemoryUserRepository, MockUserRepositoryTrait};

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key_32_bytes_long!!".to_string(),
            token_ttl_hours: 48,
            cookie_name: "token".to_string(),
            cookie_max_age_seconds: 3600,
            cookie_secure: false,
            bcrypt_cost: 4,
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: Username().fake(),
            password: Password(8..20).fake(),
        }
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryUserRepository::new()), config())
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = service();
        let creds = credentials();
        let again = Credentials {
            username: creds.username.clone(),
            password: creds.password.clone(),
        };

        let token = service.register(creds).await.unwrap();
        let claims = service.verify(Some(&token)).unwrap();
        assert_eq!(claims.username, again.username);

        let token = service.login(again).await.unwrap();
        assert!(service.verify(Some(&token)).is_some());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let service = service();
        let creds = credentials();
        let dup = Credentials {
            username: creds.username.clone(),
            password: "other".to_string(),
        };

        service.register(creds).await.unwrap();
        let err = service.register(dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let service = service();
        let creds = credentials();
        let wrong = Credentials {
            username: creds.username.clone(),
            password: format!("{}-nope", creds.password),
        };

        service.register(creds).await.unwrap();
        let err = service.login(wrong).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let err = service().login(credentials()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_find_by_username().never();
        users.expect_create().never();
        let service = AuthService::new(Arc::new(users), config());

        let err = service
            .register(Credentials {
                username: "alice".to_string(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn status_requires_existing_user() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let service = AuthService::new(Arc::new(users), config());

        let token = service
            .tokens
            .issue(uuid::Uuid::new_v4(), "ghost")
            .unwrap();
        let status = service.status(Some(&token)).await;
        assert!(!status.is_authenticated);
    }

    #[tokio::test]
    async fn garbage_token_is_anonymous() {
        let service = service();
        assert!(service.verify(Some("not.a.jwt")).is_none());
        assert!(service.verify(None).is_none());
        assert!(!service.status(Some("not.a.jwt")).await.is_authenticated);
    }

    #[test]
    fn session_cookie_attributes() {
        let service = service();
        let cookie = service.session_cookie("abc".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));

        let removal = service.removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(CookieDuration::ZERO));
    }
}
