pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid graph payload: {message}")]
    InvalidPayload { message: String },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}
