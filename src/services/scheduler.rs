use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::models::Department;
use crate::services::poller::{poll_department, PollReport};
use crate::state::AppState;

/// Polls every configured department concurrently.
pub async fn sweep(state: &AppState) -> Vec<(Department, PollReport)> {
    let departments = &state.config.departments;
    let reports = join_all(departments.iter().map(|department| async move {
        (department.clone(), poll_department(state, department).await)
    }))
    .await;

    let announced: usize = reports.iter().map(|(_, r)| r.announced).sum();
    let failed = reports.iter().filter(|(_, r)| r.fetch_failed).count();
    tracing::info!(
        departments = reports.len(),
        failed,
        announced,
        known_slots = state.registry.len(),
        "sweep finished"
    );

    reports
}

/// Sweeps right away, then on every interval tick, forever. Each sweep
/// runs in its own task so a slow one never holds back the next tick;
/// overlapping sweeps are kept apart by the dedup registry.
pub async fn run(state: Arc<AppState>) {
    let period = Duration::from_secs(state.config.check_interval_secs);
    let mut ticker = tokio::time::interval(period);
    tracing::info!(
        interval_secs = state.config.check_interval_secs,
        departments = state.config.departments.len(),
        "scheduler started"
    );

    loop {
        ticker.tick().await;
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            sweep(&state).await;
        });
    }
}
