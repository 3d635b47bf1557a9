use crate::config::AppConfig;
use crate::services::dedup::DedupRegistry;
use crate::services::feed::FeedClient;
use crate::services::publishing::Publisher;

pub struct AppState {
    pub config: AppConfig,
    pub feed: FeedClient,
    pub registry: DedupRegistry,
    pub publisher: Box<dyn Publisher>,
}
