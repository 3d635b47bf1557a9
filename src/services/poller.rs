use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::config::AppConfig;
use crate::models::{AppointmentCenter, Department};
use crate::services::{geo, slots};
use crate::state::AppState;

/// What happened to one department during one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub fetch_failed: bool,
    pub fetched: usize,
    pub eligible: usize,
    pub announced: usize,
    pub publish_failures: usize,
}

/// Fetches one department and announces every new chronodose slot in
/// range. Never fails: fetch and publish errors are logged and counted.
pub async fn poll_department(state: &AppState, department: &Department) -> PollReport {
    tracing::info!(department = %department, "fetching department");
    let centers = match state.feed.fetch_department(department).await {
        Ok(centers) => centers,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(department = %department, error = %error, "failed to fetch department");
            return PollReport {
                fetch_failed: true,
                ..PollReport::default()
            };
        }
    };
    tracing::info!(department = %department, centers = centers.len(), "fetched department");

    let now = Utc::now();
    let eligible: Vec<&AppointmentCenter> = centers
        .iter()
        .filter(|center| is_eligible(&state.config, center, now))
        .collect();

    let outcomes = join_all(eligible.iter().map(|center| announce(state, center, now))).await;

    let mut report = PollReport {
        fetched: centers.len(),
        eligible: eligible.len(),
        ..PollReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(true) => report.announced += 1,
            Ok(false) => {}
            Err(e) => {
                report.publish_failures += 1;
                let error = format!("{e:#}");
                tracing::error!(department = %department, error = %error, "failed to publish announcement");
            }
        }
    }
    report
}

/// Cheap filters applied before building a message.
pub fn is_eligible(config: &AppConfig, center: &AppointmentCenter, now: DateTime<Utc>) -> bool {
    geo::within_radius(
        config.center_lat,
        config.center_lon,
        center.location.latitude,
        center.location.longitude,
        config.max_radius_km,
    ) && center.has_chronodose()
        && center.offers_any(&config.vaccine_types)
        && slots::within_horizon(center, config.max_hours_ahead, now)
}

/// Returns `Ok(true)` when this call published the slot. The identity is
/// claimed before publishing and stays claimed if publishing fails.
async fn announce(
    state: &AppState,
    center: &AppointmentCenter,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let config = &state.config;
    let Some(announcement) = slots::extract(center, config.min_doses, config.timezone, now) else {
        return Ok(false);
    };

    if !state.registry.claim(&announcement.identity) {
        tracing::debug!(identity = %announcement.identity, "already announced");
        return Ok(false);
    }

    state
        .publisher
        .publish(&announcement)
        .await
        .with_context(|| format!("failed to publish {}", announcement.identity))?;

    tracing::info!(identity = %announcement.identity, "announced");
    Ok(true)
}
