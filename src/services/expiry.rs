//! Background removal of expired links.
//!
//! Redirects already refuse expired links, so the sweeper only keeps the
//! store from growing. It runs for the lifetime of the server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::errors::RepositoryError;
use crate::repositories::DynLinkRepository;

pub struct ExpirySweeper {
    repository: Arc<DynLinkRepository>,
    period: Duration,
}

impl ExpirySweeper {
    pub fn new(repository: Arc<DynLinkRepository>, period: Duration) -> Self {
        Self { repository, period }
    }

    /// Deletes every link that expired before `now`
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let removed = self.repository.purge_expired(now).await?;
        if removed > 0 {
            info!("Expiry sweep removed {} link(s)", removed);
        } else {
            debug!("Expiry sweep found nothing to remove");
        }
        Ok(removed)
    }

    /// Should be called once during server startup.
    pub fn spawn(self) -> JoinHandle<()> {
        info!("Starting expiry sweeper (every {}s)", self.period.as_secs());

        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep_once(Utc::now()).await {
                    error!("Expiry sweep failed: {}", e);
                }
            }
        })
    }
}
