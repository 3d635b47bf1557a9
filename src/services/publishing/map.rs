use std::time::Duration;

use anyhow::Context;

use super::{http_client, REQUEST_TIMEOUT};
use crate::config::MapConfig;
use crate::errors::AppError;
use crate::models::Coordinate;

/// Fetches a PNG map centred on a coordinate, with a pin on it, from a
/// staticmap-compatible HTTP service.
pub struct StaticMapRenderer {
    config: MapConfig,
    client: reqwest::Client,
}

impl StaticMapRenderer {
    pub fn new(config: MapConfig) -> anyhow::Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: MapConfig, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: http_client(timeout)?,
        })
    }

    pub fn query(&self, at: Coordinate) -> Vec<(&'static str, String)> {
        let point = format!("{},{}", at.latitude, at.longitude);
        vec![
            ("center", point.clone()),
            ("zoom", self.config.zoom.to_string()),
            ("size", format!("{}x{}", self.config.width, self.config.height)),
            ("markers", format!("{point},red-pushpin")),
        ]
    }

    pub async fn render(&self, at: Coordinate) -> anyhow::Result<Vec<u8>> {
        let resp = self
            .client
            .get(&self.config.url)
            .query(&self.query(at))
            .send()
            .await
            .context("failed to call map service")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Map(format!("map service returned {status}")).into());
        }

        let image = resp.bytes().await.context("failed to read map image")?;
        if image.is_empty() {
            return Err(AppError::Map("map service returned an empty image".to_string()).into());
        }

        Ok(image.to_vec())
    }
}
