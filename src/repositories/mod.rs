use std::sync::Arc;

mod link;
mod memory;
mod user;

#[cfg(test)]
pub use link::MockLinkRepositoryTrait;
pub use link::{LinkRepositoryTrait, PgLinkRepository};
pub use memory::{MemoryLinkRepository, MemoryUserRepository};
#[cfg(test)]
pub use user::MockUserRepositoryTrait;
pub use user::{PgUserRepository, UserRepositoryTrait};

use crate::db::Database;

pub type DynLinkRepository = dyn LinkRepositoryTrait;
pub type DynUserRepository = dyn UserRepositoryTrait;

/// The repositories backing one running instance
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<DynLinkRepository>,
    pub users: Arc<DynUserRepository>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(db)),
            users: Arc::new(PgUserRepository::new(db)),
        }
    }

    pub fn memory() -> Self {
        Self {
            links: Arc::new(MemoryLinkRepository::new()),
            users: Arc::new(MemoryUserRepository::new()),
        }
    }
}
