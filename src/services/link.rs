// src/services/link.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::LinkConfig;
use crate::errors::{AppError, RepositoryError};
use crate::models::{Link, LinkKind, ShortenRequest};
use crate::repositories::DynLinkRepository;
use crate::utils::{id_generator, qr};

type Result<T> = std::result::Result<T, AppError>;

#[async_trait]
pub trait LinkServiceTrait {
    /// Creates a link for `dto.original_url`. Owned links need an owner, demo links must not have one.
    async fn shorten(&self, kind: LinkKind, dto: ShortenRequest, owner_id: Option<Uuid>) -> Result<Link>;
    async fn get_details(&self, id: &Uuid) -> Result<Link>;
    async fn list_for_owner(&self, owner_id: &Uuid) -> Result<Vec<Link>>;
    async fn delete(&self, id: &Uuid) -> Result<()>;
    /// QR code (as a data URL) pointing at the short URL of `code`
    async fn qr_code(&self, kind: LinkKind, code: &str) -> Result<String>;
    fn short_url(&self, link: &Link) -> String;
}

pub struct LinkService {
    repository: Arc<DynLinkRepository>,
    config: LinkConfig,
}

impl LinkService {
    pub fn new(repository: Arc<DynLinkRepository>, config: LinkConfig) -> Self {
        Self { repository, config }
    }

    /// Details and deletion only apply to account links
    async fn find_owned(&self, id: &Uuid) -> Result<Link> {
        match self.repository.find_by_id(id).await? {
            Some(link) if link.kind == LinkKind::Owned => Ok(link),
            _ => Err(AppError::NotFound("URL not found".to_string())),
        }
    }
}

#[async_trait]
impl LinkServiceTrait for LinkService {
    async fn shorten(&self, kind: LinkKind, dto: ShortenRequest, owner_id: Option<Uuid>) -> Result<Link> {
        dto.validate()?;

        match (kind, owner_id) {
            (LinkKind::Owned, None) => {
                return Err(AppError::Unauthorized("Unauthorized".to_string()));
            }
            (LinkKind::Demo, Some(_)) => {
                return Err(AppError::Internal(
                    "Demo links cannot have an owner".to_string(),
                ));
            }
            _ => {}
        }

        let original_url = dto.original_url.trim().to_string();
        let ttl = Duration::try_hours(self.config.ttl_hours)
            .filter(|ttl| *ttl > Duration::zero() && Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AppError::Internal(format!("Invalid link TTL: {} hours", self.config.ttl_hours))
            })?;

        // Codes are only unique with high probability, so retry on a taken one
        for attempt in 1..=self.config.max_code_attempts {
            let short_code = id_generator::generate_short_code(&original_url, self.config.code_length);
            let link = Link::new(kind, original_url.clone(), short_code, owner_id, ttl);

            match self.repository.create(&link).await {
                Ok(_) => {
                    info!(
                        "Created {:?} link '{}' -> '{}'",
                        kind, link.short_code, link.original_url
                    );
                    return Ok(link);
                }
                Err(RepositoryError::Conflict(msg)) => {
                    warn!(
                        "Short code collision on attempt {}/{}: {}",
                        attempt, self.config.max_code_attempts, msg
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "Failed to generate a unique short code after multiple attempts".to_string(),
        ))
    }

    async fn get_details(&self, id: &Uuid) -> Result<Link> {
        self.find_owned(id).await
    }

    async fn list_for_owner(&self, owner_id: &Uuid) -> Result<Vec<Link>> {
        let links = self.repository.find_all_by_owner(owner_id).await?;
        debug!("Found {} links for owner {}", links.len(), owner_id);
        Ok(links)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let link = self.find_owned(id).await?;

        if !self.repository.delete_by_id(&link.id).await? {
            return Err(AppError::NotFound("URL not found".to_string()));
        }

        info!("Deleted link '{}' ({})", link.short_code, link.id);
        Ok(())
    }

    async fn qr_code(&self, kind: LinkKind, code: &str) -> Result<String> {
        let link = self
            .repository
            .find_by_code(kind, code)
            .await?
            .ok_or_else(|| AppError::NotFound("Shortened URL not found".to_string()))?;

        qr::qr_data_url(&self.short_url(&link))
            .map_err(|e| AppError::Internal(format!("Failed to render QR code: {}", e)))
    }

    fn short_url(&self, link: &Link) -> String {
        link.short_url(&self.config.public_base_url)
    }
}
