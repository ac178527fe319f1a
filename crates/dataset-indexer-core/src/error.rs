use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The scan root is missing. Carries the address as the caller supplied it,
    /// not the parent directory it may have been resolved to.
    #[error("Address does not exist: {address}")]
    AddressNotFound { address: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::AddressNotFound { .. })
    }
}
