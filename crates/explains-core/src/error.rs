use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable {name} is not set")]
    MissingEnv { name: String },

    #[error("Environment variable {name} is not valid JSON: {source}")]
    MalformedEnv {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    /// Short error code string used in structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::MissingEnv { .. } => "MISSING_ENV",
            CoreError::MalformedEnv { .. } => "MALFORMED_ENV",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
