use explains_engine::ExplainsError;

/// Errors produced by the Discord adapter and its commands.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("serenity error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("explains failed: {0}")]
    Explains(#[from] ExplainsError),
}
