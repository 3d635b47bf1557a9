pub mod console;
pub mod map;
pub mod twitter;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::models::Announcement;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build publisher HTTP client")
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, announcement: &Announcement) -> anyhow::Result<()>;
}

/// Used when no run mode is selected: announcements are deduped but go
/// nowhere.
pub struct NoopPublisher;

#[async_trait]
impl Publisher for NoopPublisher {
    async fn publish(&self, announcement: &Announcement) -> anyhow::Result<()> {
        tracing::debug!(identity = %announcement.identity, "publishing disabled, dropping announcement");
        Ok(())
    }
}
