use explains_core::CoreError;

/// Failures raised by an explanation engine while it runs.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected engine response: {0}")]
    Parse(String),

    #[error("engine failed: {0}")]
    Failed(String),
}

/// Failures of one `explains` invocation.
#[derive(Debug, thiserror::Error)]
pub enum ExplainsError {
    /// The engine configuration could not be built from the environment.
    #[error("engine configuration: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
