#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("map rendering error: {0}")]
    Map(String),

    #[error("twitter error: {0}")]
    Twitter(String),
}
