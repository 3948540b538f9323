use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to decode document: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    #[error("Failed to encode document: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    #[error("Invalid pool {pool}: {reason}")]
    InvalidPool { pool: String, reason: String },

    #[error("Environment variable {0} must be provided")]
    MissingEnv(&'static str),

    #[error("{0} is not initialized")]
    NotInitialized(&'static str),

    #[error("Logger error: {0}")]
    Logger(String),
}
