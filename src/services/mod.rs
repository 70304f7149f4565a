use std::time::Duration;

use actix_web::web;

mod auth;
mod expiry;
mod link;
mod redirect;

pub use auth::AuthService;
pub use expiry::ExpirySweeper;
pub use link::{LinkService, LinkServiceTrait};
pub use redirect::RedirectService;

use crate::{
    config::{AuthConfig, LinkConfig},
    repositories::Repositories,
};

/// Services shared by every worker
#[derive(Clone)]
pub struct Services {
    pub links: web::Data<LinkService>,
    pub redirects: web::Data<RedirectService>,
    pub auth: web::Data<AuthService>,
}

impl Services {
    pub fn new(repositories: &Repositories, links: LinkConfig, auth: AuthConfig) -> Self {
        Self {
            links: web::Data::new(LinkService::new(repositories.links.clone(), links)),
            redirects: web::Data::new(RedirectService::new(repositories.links.clone())),
            auth: web::Data::new(AuthService::new(repositories.users.clone(), auth)),
        }
    }

    /// Service Register
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.links.clone())
            .app_data(self.redirects.clone())
            .app_data(self.auth.clone());
    }
}

/// Builds the sweeper for the link store behind `repositories`
pub fn expiry_sweeper(repositories: &Repositories, config: &LinkConfig) -> ExpirySweeper {
    ExpirySweeper::new(
        repositories.links.clone(),
        Duration::from_secs(config.sweep_interval_seconds.max(1)),
    )
}
