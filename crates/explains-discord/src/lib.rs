pub mod adapter;
pub mod commands;
pub mod context;
pub mod error;
pub mod handler;
pub mod send;

pub use adapter::DiscordAdapter;
pub use commands::{dispatch, Command};
pub use context::CommandContext;
pub use error::DiscordError;
pub use send::ReplyTarget;
