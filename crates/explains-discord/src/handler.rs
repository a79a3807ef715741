use std::sync::{Arc, OnceLock};

use serenity::all::{ActivityData, ShardManager};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::user::OnlineStatus;
use serenity::prelude::{Context, EventHandler};
use tracing::{error, info};

use explains_core::config::DiscordConfig;
use explains_core::{Author, InboundMessage};

use crate::context::CommandContext;
use crate::send::ChannelReply;

/// Serenity event handler wired to the command router.
pub struct DiscordHandler<C: CommandContext + 'static> {
    pub ctx: Arc<C>,
    pub config: DiscordConfig,
    /// Set by the adapter once the client is built; used for `ping` latency.
    pub shard_manager: Arc<OnceLock<Arc<ShardManager>>>,
}

#[async_trait]
impl<C: CommandContext + 'static> EventHandler for DiscordHandler<C> {
    async fn ready(&self, ctx: Context, ready: Ready) {
        // Config-driven presence.
        let status = parse_online_status(&self.config.status);
        let activity = build_activity(&self.config);
        ctx.set_presence(activity, status);

        info!(name = %ready.user.name, "Bot is ready.");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = to_inbound(&msg);
        let reply = ChannelReply {
            http: Arc::clone(&ctx.http),
            channel_id: msg.channel_id,
            shard: self
                .shard_manager
                .get()
                .map(|manager| (Arc::clone(manager), ctx.shard_id)),
        };

        // Serenity runs each event in its own task; a failing command only
        // ends that task.
        if let Err(e) = crate::commands::dispatch(self.ctx.as_ref(), &inbound, &reply).await {
            error!(
                error = %e,
                channel = %msg.channel_id,
                author = %msg.author.name,
                "command failed"
            );
        }
    }
}

fn to_inbound(msg: &Message) -> InboundMessage {
    let author = Author {
        id: msg.author.id.get(),
        name: msg.author.name.clone(),
        bot: msg.author.bot,
    };
    InboundMessage::new(msg.content.clone(), author, msg.channel_id.get())
}

/// Parse a config status string into serenity's `OnlineStatus`.
fn parse_online_status(s: &str) -> OnlineStatus {
    match s.to_lowercase().as_str() {
        "idle" => OnlineStatus::Idle,
        "dnd" | "do_not_disturb" => OnlineStatus::DoNotDisturb,
        "invisible" => OnlineStatus::Invisible,
        _ => OnlineStatus::Online,
    }
}

/// Build an `ActivityData` from the Discord config.
fn build_activity(config: &DiscordConfig) -> Option<ActivityData> {
    let name = config.activity_name.as_deref()?;
    let kind = config.activity_type.as_deref().unwrap_or("playing");
    Some(match kind.to_lowercase().as_str() {
        "listening" => ActivityData::listening(name),
        "watching" => ActivityData::watching(name),
        "competing" => ActivityData::competing(name),
        "custom" => ActivityData::custom(name),
        _ => ActivityData::playing(name),
    })
}
