// src/models/link.rs - Pure data structures
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validations::validate_url;

/// Whether a link belongs to an account or was created through the anonymous demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Owned,
    Demo,
}

impl LinkKind {
    /// Path segment under `/api` that serves redirects for this kind
    pub fn route_segment(&self) -> &'static str {
        match self {
            LinkKind::Owned => "url",
            LinkKind::Demo => "demo",
        }
    }
}

// DTO for creating a new short link
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(rename = "originalUrl", alias = "demo_originalUrl")]
    #[validate(custom(function = "validate_url"))]
    pub original_url: String,
}

/// A shortened URL with its visit analytics
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// The unique ID of the link
    pub id: Uuid,

    pub kind: LinkKind,

    /// The original, long URL that was shortened
    pub original_url: String,

    /// The generated short code that identifies this URL
    pub short_code: String,

    /// Account that created the link; absent for demo links
    pub owner_id: Option<Uuid>,

    /// Number of successful redirects
    pub visit_count: i64,

    pub last_visit_at: Option<DateTime<Utc>>,

    /// One timestamp per successful redirect, oldest first
    pub visit_history: Vec<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    /// After this instant the link no longer redirects
    pub expires_at: DateTime<Utc>,
}

impl Link {
    pub fn new(
        kind: LinkKind,
        original_url: String,
        short_code: String,
        owner_id: Option<Uuid>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            original_url,
            short_code,
            owner_id,
            visit_count: 0,
            last_visit_at: None,
            visit_history: Vec::new(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Applies one redirect to the in-memory record
    pub fn register_visit(&mut self, at: DateTime<Utc>) {
        self.visit_count += 1;
        self.last_visit_at = Some(at);
        self.visit_history.push(at);
    }

    /// Public URL that redirects to `original_url`
    pub fn short_url(&self, base_url: &str) -> String {
        format!(
            "{}/api/{}/{}",
            base_url.trim_end_matches('/'),
            self.kind.route_segment(),
            self.short_code
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    pub qr_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> Link {
        Link::new(
            LinkKind::Owned,
            "https://example.com/a/b/c".to_string(),
            "abc1234".to_string(),
            Some(Uuid::new_v4()),
            Duration::hours(24),
        )
    }

    #[test]
    fn new_link_expires_after_ttl() {
        let link = link();
        assert_eq!(link.expires_at - link.created_at, Duration::hours(24));
        assert!(!link.is_expired_at(Utc::now()));
        assert!(link.is_expired_at(link.expires_at + Duration::seconds(1)));
        assert!(!link.is_expired_at(link.expires_at));
    }

    #[test]
    fn visits_keep_history_in_step_with_count() {
        let mut link = link();
        let first = Utc::now();
        link.register_visit(first);
        link.register_visit(first + Duration::seconds(1));

        assert_eq!(link.visit_count, 2);
        assert_eq!(link.visit_history.len(), 2);
        assert_eq!(link.last_visit_at, Some(first + Duration::seconds(1)));
    }

    #[test]
    fn short_url_uses_kind_segment() {
        let mut link = link();
        assert_eq!(
            link.short_url("http://localhost:8000/"),
            "http://localhost:8000/api/url/abc1234"
        );

        link.kind = LinkKind::Demo;
        assert_eq!(
            link.short_url("https://sho.rt"),
            "https://sho.rt/api/demo/abc1234"
        );
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(link()).unwrap();
        assert!(value.get("originalUrl").is_some());
        assert!(value.get("visitHistory").is_some());
        assert_eq!(value["kind"], "owned");
    }

    #[test]
    fn shorten_request_accepts_demo_key() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"demo_originalUrl":"https://example.com"}"#).unwrap();
        assert_eq!(req.original_url, "https://example.com");
        assert!(req.validate().is_ok());

        let bad: ShortenRequest = serde_json::from_str(r#"{"originalUrl":"nope"}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
