use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use crate::errors::AppError;
use crate::models::{Link, LinkKind};
use crate::repositories::DynLinkRepository;
use crate::validations::validate_short_code;

type Result<T> = std::result::Result<T, AppError>;

/// Resolves short codes and records the visit
pub struct RedirectService {
    repository: Arc<DynLinkRepository>,
}

impl RedirectService {
    pub fn new(repository: Arc<DynLinkRepository>) -> Self {
        Self { repository }
    }

    /// Returns the link behind `code` with this visit already counted.
    ///
    /// ### Errors
    /// * `AppError::NotFound` - Unknown code, or the link vanished mid-request
    /// * `AppError::Gone` - The link has expired; nothing is recorded
    pub async fn resolve(&self, kind: LinkKind, code: &str) -> Result<Link> {
        debug!("Redirect requested for {:?} code: {}", kind, code);

        if validate_short_code(code).is_err() {
            return Err(AppError::NotFound("URL not found".to_string()));
        }

        let link = self
            .repository
            .find_by_code(kind, code)
            .await?
            .ok_or_else(|| AppError::NotFound("URL not found".to_string()))?;

        let now = Utc::now();
        if link.is_expired_at(now) {
            info!("Link '{}' expired at {}", code, link.expires_at);
            return Err(AppError::Gone("URL has expired".to_string()));
        }

        let visited = self
            .repository
            .record_visit(&link.id, now)
            .await?
            .ok_or_else(|| AppError::NotFound("URL not found".to_string()))?;

        info!(
            "Redirecting '{}' to '{}' (visit #{})",
            code, visited.original_url, visited.visit_count
        );
        Ok(visited)
    }
}
