pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid numeric input: {0}")]
    InvalidNumber(f64),

    #[error("Invalid rational literal: {0:?}")]
    InvalidRational(String),

    #[error("Value not representable as f64: {0}")]
    Unrepresentable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
