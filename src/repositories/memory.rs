//! Process-local storage backend.
//!
//! Records live in hash maps behind tokio `RwLock`s and vanish on restart.
//! Used for local runs without PostgreSQL and by the HTTP tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LinkRepositoryTrait, UserRepositoryTrait};
use crate::errors::RepositoryError;
use crate::models::{Link, LinkKind, User};

type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Default)]
pub struct MemoryLinkRepository {
    links: RwLock<HashMap<Uuid, Link>>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepositoryTrait for MemoryLinkRepository {
    async fn create(&self, link: &Link) -> Result<Uuid> {
        let mut links = self.links.write().await;

        if links.values().any(|l| l.short_code == link.short_code) {
            return Err(RepositoryError::Conflict(format!(
                "Short code '{}' already exists",
                link.short_code
            )));
        }
        if links.contains_key(&link.id) {
            return Err(RepositoryError::Conflict(format!(
                "Link with ID {} already exists",
                link.id
            )));
        }

        links.insert(link.id, link.clone());
        Ok(link.id)
    }

    async fn find_by_code(&self, kind: LinkKind, code: &str) -> Result<Option<Link>> {
        let links = self.links.read().await;
        Ok(links
            .values()
            .find(|l| l.kind == kind && l.short_code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Link>> {
        Ok(self.links.read().await.get(id).cloned())
    }

    async fn find_all_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Link>> {
        let links = self.links.read().await;
        let mut owned: Vec<Link> = links
            .values()
            .filter(|l| l.owner_id.as_ref() == Some(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn save(&self, link: &Link) -> Result<()> {
        let mut links = self.links.write().await;
        match links.get_mut(&link.id) {
            Some(stored) => {
                *stored = link.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!(
                "Link with ID {} not found",
                link.id
            ))),
        }
    }

    async fn record_visit(&self, id: &Uuid, at: DateTime<Utc>) -> Result<Option<Link>> {
        let mut links = self.links.write().await;
        match links.get_mut(id) {
            Some(link) if !link.is_expired_at(at) => {
                link.register_visit(at);
                Ok(Some(link.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool> {
        Ok(self.links.write().await.remove(id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|_, link| link.expires_at >= now);
        Ok((before - links.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryUserRepository {
    async fn create(&self, user: &User) -> Result<Uuid> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user.id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
