use thiserror::Error;

/// Errors that can occur while loading the application config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors produced when decoding a color from its channel list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected 3 or 4 color channels, got {0}")]
    ChannelCount(usize),
}
