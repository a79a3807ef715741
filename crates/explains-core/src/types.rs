use std::fmt;

/// Who sent a message, as seen by the command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Platform user ID (Discord snowflake).
    pub id: u64,
    /// Display name shown by `whoami`.
    pub name: String,
    /// Messages from bot accounts are never treated as commands.
    pub bot: bool,
}

impl Author {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: false,
        }
    }

    /// Mention handle that pings the user when embedded in a message (`<@id>`).
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A message received from the gateway. Read-only to command handlers.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub content: String,
    pub author: Author,
    /// Channel the message came from; replies go back here.
    pub channel_id: u64,
}

impl InboundMessage {
    pub fn new(content: impl Into<String>, author: Author, channel_id: u64) -> Self {
        Self {
            content: content.into(),
            author,
            channel_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_uses_discord_user_syntax() {
        let author = Author::new(80351110224678912, "nelly");
        assert_eq!(author.mention(), "<@80351110224678912>");
    }

    #[test]
    fn display_is_the_name() {
        assert_eq!(Author::new(1, "asottile").to_string(), "asottile");
    }
}
