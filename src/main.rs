use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chronobot::config::{AppConfig, RunMode};
use chronobot::services::dedup::DedupRegistry;
use chronobot::services::feed::FeedClient;
use chronobot::services::publishing::console::ConsolePublisher;
use chronobot::services::publishing::map::StaticMapRenderer;
use chronobot::services::publishing::twitter::{TwitterClient, TwitterPublisher};
use chronobot::services::publishing::{NoopPublisher, Publisher};
use chronobot::services::scheduler;
use chronobot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let publisher: Box<dyn Publisher> = match config.mode {
        RunMode::Simulate => {
            tracing::info!("simulate mode: announcements are printed, not tweeted");
            Box::new(ConsolePublisher::stdout())
        }
        RunMode::Publish => {
            tracing::info!(map_service = %config.map.url, "publish mode: announcements are tweeted");
            Box::new(TwitterPublisher::new(
                StaticMapRenderer::new(config.map.clone())?,
                TwitterClient::new(config.twitter.clone())?,
            ))
        }
        RunMode::Disabled => {
            tracing::info!("ENV is neither TEST nor PROD: announcements are computed but dropped");
            Box::new(NoopPublisher)
        }
    };

    let state = Arc::new(AppState {
        feed: FeedClient::new(config.feed_base_url.clone())?,
        config,
        registry: DedupRegistry::new(),
        publisher,
    });

    tracing::info!(
        lat = state.config.center_lat,
        lon = state.config.center_lon,
        radius_km = state.config.max_radius_km,
        min_doses = state.config.min_doses,
        "watching for chronodoses"
    );

    scheduler::run(state).await;

    Ok(())
}
