use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{ShardId, ShardManager};
use serenity::http::Http;
use serenity::model::id::ChannelId;

use crate::error::DiscordError;

/// Maximum characters per Discord message (2000 is the limit; we use 1950 for safety).
const CHUNK_MAX: usize = 1950;

/// Where a command's reply goes, plus the gateway facts commands may report.
#[async_trait]
pub trait ReplyTarget: Send + Sync {
    /// Send `text` to the channel the command came from.
    async fn send(&self, text: &str) -> Result<(), DiscordError>;

    /// Last measured gateway heartbeat round trip, if any.
    async fn latency(&self) -> Option<Duration>;
}

/// Reply target for a serenity channel.
pub struct ChannelReply {
    pub http: Arc<Http>,
    pub channel_id: ChannelId,
    pub shard: Option<(Arc<ShardManager>, ShardId)>,
}

#[async_trait]
impl ReplyTarget for ChannelReply {
    async fn send(&self, text: &str) -> Result<(), DiscordError> {
        send_chunked(&self.http, self.channel_id, text).await?;
        Ok(())
    }

    async fn latency(&self) -> Option<Duration> {
        let (manager, shard_id) = self.shard.as_ref()?;
        let runners = manager.runners.lock().await;
        runners.get(shard_id).and_then(|runner| runner.latency)
    }
}

/// Split `text` into chunks of at most [`CHUNK_MAX`] bytes, preferring
/// splits on whitespace/newline boundaries to avoid cutting words mid-way.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.len() > CHUNK_MAX {
        let mut limit = CHUNK_MAX;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }

        // Try to split after the last newline within the window. The separator
        // stays on the earlier chunk so no text is dropped.
        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .map(|i| i + 1)
            .unwrap_or(limit);

        chunks.push(remaining[..split_at].to_string());
        remaining = &remaining[split_at..];
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }

    chunks
}

/// Send `text` to `channel_id` in ≤1950-byte chunks.
pub async fn send_chunked(
    http: &Http,
    channel_id: ChannelId,
    text: &str,
) -> Result<(), serenity::Error> {
    for chunk in split_chunks(text) {
        channel_id.say(http, &chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = split_chunks("<@1>, here you go: The sky is blue  because.");
        assert_eq!(chunks, vec!["<@1>, here you go: The sky is blue  because."]);
    }

    #[test]
    fn long_text_splits_on_newline() {
        let line = "a".repeat(1000);
        let text = format!("{}\n{}", line, line);
        let chunks = split_chunks(&text);
        // Both halves fit inside CHUNK_MAX, so should be 2 chunks.
        assert_eq!(chunks.len(), 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX, "chunk too large: {}", c.len());
        }
    }

    #[test]
    fn very_long_word_still_splits() {
        let text = "x".repeat(4000);
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX);
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundary() {
        let text = "\u{1f3d3}".repeat(1000);
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn split_keeps_indentation_and_blank_lines() {
        let text = format!(
            "{}\n    indented code line\n\n        deeper",
            "a".repeat(1940)
        );
        let chunks = split_chunks(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with('\n'));
        assert!(chunks[1].starts_with("    indented"));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn split_on_space_keeps_every_byte() {
        let text = format!("{} {}", "b".repeat(1900), "  c".repeat(100));
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX);
        }
        assert_eq!(chunks.concat(), text);
    }
}
