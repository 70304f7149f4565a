// src/repositories/link.rs - Data access
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::{Link, LinkKind};

type Result<T> = std::result::Result<T, RepositoryError>;

const LINK_COLUMNS: &str = "id, kind, original_url, short_code, owner_id, visit_count, \
     last_visit_at, visit_history, created_at, expires_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepositoryTrait: Send + Sync {
    /// Persists a new link
    ///
    /// ### Returns
    /// * `Result<Uuid>` - The id of the stored record
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the short code is already taken
    /// * `RepositoryError::Database` - If a database error occurs
    async fn create(&self, link: &Link) -> Result<Uuid>;

    /// Finds a link of the given kind by its short code
    ///
    /// Expired records that have not been purged yet are still returned.
    async fn find_by_code(&self, kind: LinkKind, code: &str) -> Result<Option<Link>>;

    /// Finds a link by its unique identifier
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Link>>;

    /// Lists every link created by `owner_id`, newest first
    async fn find_all_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Link>>;

    /// Overwrites the mutable fields of an existing link
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If no link has this id
    async fn save(&self, link: &Link) -> Result<()>;

    /// Atomically counts one visit at `at`: increments the counter, sets the
    /// last visit and appends to the history in a single step.
    ///
    /// ### Returns
    /// * `Ok(Some(link))` - The updated record
    /// * `Ok(None)` - If the link is gone or expired as of `at`
    async fn record_visit(&self, id: &Uuid, at: DateTime<Utc>) -> Result<Option<Link>>;

    /// Deletes a link by id
    ///
    /// ### Returns
    /// * `Result<bool>` - Whether a record was removed
    async fn delete_by_id(&self, id: &Uuid) -> Result<bool>;

    /// Removes every link whose expiry lies before `now`
    ///
    /// ### Returns
    /// * `Result<u64>` - Number of records removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

// Implementation using actual database
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl LinkRepositoryTrait for PgLinkRepository {
    async fn create(&self, link: &Link) -> Result<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
                INSERT INTO links
                (id, kind, original_url, short_code, owner_id, visit_count, last_visit_at, visit_history, created_at, expires_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id
            "#,
        )
        .bind(link.id)
        .bind(link.kind)
        .bind(&link.original_url)
        .bind(&link.short_code)
        .bind(link.owner_id)
        .bind(link.visit_count)
        .bind(link.last_visit_at)
        .bind(&link.visit_history)
        .bind(link.created_at)
        .bind(link.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert link: {}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_code(&self, kind: LinkKind, code: &str) -> Result<Option<Link>> {
        let query = format!(
            "SELECT {} FROM links WHERE short_code = $1 AND kind = $2",
            LINK_COLUMNS
        );

        sqlx::query_as::<_, Link>(&query)
            .bind(code)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Database)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Link>> {
        let query = format!("SELECT {} FROM links WHERE id = $1", LINK_COLUMNS);

        sqlx::query_as::<_, Link>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Database)
    }

    async fn find_all_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Link>> {
        let query = format!(
            "SELECT {} FROM links WHERE owner_id = $1 ORDER BY created_at DESC",
            LINK_COLUMNS
        );

        sqlx::query_as::<_, Link>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::Database)
    }

    async fn save(&self, link: &Link) -> Result<()> {
        debug!("Saving link {}", link.id);

        let result = sqlx::query(
            r#"
            UPDATE links
            SET original_url = $2, visit_count = $3, last_visit_at = $4, visit_history = $5, expires_at = $6
            WHERE id = $1
            "#,
        )
        .bind(link.id)
        .bind(&link.original_url)
        .bind(link.visit_count)
        .bind(link.last_visit_at)
        .bind(&link.visit_history)
        .bind(link.expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Link with ID {} not found",
                link.id
            )));
        }

        Ok(())
    }

    async fn record_visit(&self, id: &Uuid, at: DateTime<Utc>) -> Result<Option<Link>> {
        // One statement, so concurrent redirects cannot lose updates
        let query = format!(
            r#"
            UPDATE links
            SET visit_count = visit_count + 1,
                last_visit_at = $2,
                visit_history = array_append(visit_history, $2)
            WHERE id = $1 AND expires_at >= $2
            RETURNING {}
            "#,
            LINK_COLUMNS
        );

        sqlx::query_as::<_, Link>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to record visit for link {}: {}", id, e);
                RepositoryError::from(e)
            })
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM links WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::Database)?;

        Ok(result.rows_affected())
    }
}
