//! Application context handed to every command handler.
//!
//! Implemented by `AppState` in `explains-bot`; tests provide their own.

use explains_engine::Explainer;

pub trait CommandContext: Send + Sync {
    /// Leading text that marks a message as a command (e.g. `!`).
    fn prefix(&self) -> &str;

    fn explainer(&self) -> &Explainer;
}
