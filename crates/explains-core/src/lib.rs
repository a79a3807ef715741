pub mod config;
pub mod error;
pub mod types;

pub use config::{BotConfig, EngineConfig};
pub use error::{CoreError, Result};
pub use types::{Author, InboundMessage};
