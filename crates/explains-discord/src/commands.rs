//! Prefix commands — `ping`, `whoami`, `explains`.
//!
//! A message is a command when it starts with the configured prefix directly
//! followed by a registered command name. Anything else is ignored without a
//! reply.

use std::time::Duration;

use tracing::debug;

use explains_core::{Author, InboundMessage};
use explains_engine::ExplainsError;

use crate::context::CommandContext;
use crate::error::DiscordError;
use crate::send::ReplyTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Whoami,
    Explains,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Whoami => "whoami",
            Command::Explains => "explains",
        }
    }

    /// Recognize the command in `content`, if any.
    ///
    /// The name is the run of non-whitespace right after `prefix`; matching is
    /// case-sensitive.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let name = rest.split(char::is_whitespace).next().unwrap_or("");
        match name {
            "ping" => Some(Command::Ping),
            "whoami" => Some(Command::Whoami),
            "explains" => Some(Command::Explains),
            _ => None,
        }
    }
}

/// Route `msg` to its command handler and wait for it to finish.
///
/// Returns the command that ran, or `None` when the message was not a command.
/// Handler errors are returned to the caller, which is expected to log them.
pub async fn dispatch<C: CommandContext + ?Sized>(
    ctx: &C,
    msg: &InboundMessage,
    reply: &dyn ReplyTarget,
) -> Result<Option<Command>, DiscordError> {
    if msg.author.bot {
        return Ok(None);
    }
    let Some(command) = Command::parse(&msg.content, ctx.prefix()) else {
        return Ok(None);
    };

    debug!(
        command = command.name(),
        author = %msg.author,
        channel = msg.channel_id,
        "dispatching command"
    );

    match command {
        Command::Ping => {
            let latency = reply.latency().await;
            reply.send(&ping_reply(latency)).await?;
        }
        Command::Whoami => reply.send(&whoami_reply(&msg.author)).await?,
        Command::Explains => handle_explains(ctx, msg, reply).await?,
    }

    Ok(Some(command))
}

async fn handle_explains<C: CommandContext + ?Sized>(
    ctx: &C,
    msg: &InboundMessage,
    reply: &dyn ReplyTarget,
) -> Result<(), DiscordError> {
    match ctx.explainer().explain(&msg.content).await {
        Ok(answer) => reply.send(&explains_reply(&msg.author, &answer)).await,
        // Already logged inside the invocation span.
        Err(ExplainsError::Engine(_)) => reply.send(&explains_failure_reply(&msg.author)).await,
        Err(e) => Err(e.into()),
    }
}

/// `🏓 Pong with 0.12` — gateway round trip in seconds, two decimals.
pub fn ping_reply(latency: Option<Duration>) -> String {
    let secs = latency.map(|d| d.as_secs_f64()).unwrap_or(0.0);
    format!("\u{1f3d3} Pong with {:.2}", secs)
}

pub fn whoami_reply(author: &Author) -> String {
    format!("You are {}", author.name)
}

pub fn explains_reply(author: &Author, answer: &str) -> String {
    format!("{}, here you go: {}", author.mention(), answer)
}

pub fn explains_failure_reply(author: &Author) -> String {
    format!("{}, sorry, I couldn't explain that.", author.mention())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_commands() {
        assert_eq!(Command::parse("!ping", "!"), Some(Command::Ping));
        assert_eq!(Command::parse("!whoami", "!"), Some(Command::Whoami));
        assert_eq!(
            Command::parse("!explains why is the sky blue", "!"),
            Some(Command::Explains)
        );
        assert_eq!(Command::parse("!explains\nmultiline", "!"), Some(Command::Explains));
    }

    #[test]
    fn parse_rejects_non_commands() {
        assert_eq!(Command::parse("ping", "!"), None);
        assert_eq!(Command::parse("!", "!"), None);
        assert_eq!(Command::parse("! ping", "!"), None);
        assert_eq!(Command::parse("!PING", "!"), None);
        assert_eq!(Command::parse("!explainsx", "!"), None);
        assert_eq!(Command::parse("!help", "!"), None);
    }

    #[test]
    fn parse_honors_custom_prefix() {
        assert_eq!(Command::parse("?>whoami", "?>"), Some(Command::Whoami));
        assert_eq!(Command::parse("!whoami", "?>"), None);
    }

    #[test]
    fn ping_reply_has_two_decimals() {
        assert_eq!(ping_reply(Some(Duration::from_millis(123))), "\u{1f3d3} Pong with 0.12");
        assert_eq!(ping_reply(Some(Duration::from_millis(1500))), "\u{1f3d3} Pong with 1.50");
        assert_eq!(ping_reply(None), "\u{1f3d3} Pong with 0.00");
    }

    #[test]
    fn reply_formats() {
        let author = Author::new(42, "anthony");
        assert_eq!(whoami_reply(&author), "You are anthony");
        assert_eq!(explains_reply(&author, "x"), "<@42>, here you go: x");
        assert_eq!(
            explains_failure_reply(&author),
            "<@42>, sorry, I couldn't explain that."
        );
    }
}
