use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// True for errors caused by the caller's input rather than by the catalog or the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
