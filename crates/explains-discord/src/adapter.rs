use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tracing::{error, info, warn};

use explains_core::config::DiscordConfig;

use crate::context::CommandContext;
use crate::handler::DiscordHandler;

/// Discord channel adapter.
///
/// Wraps a serenity `Client` and drives the event loop until the process exits.
/// Reconnects whenever the gateway drops.
pub struct DiscordAdapter<C: CommandContext + 'static> {
    ctx: Arc<C>,
    config: DiscordConfig,
}

impl<C: CommandContext + 'static> DiscordAdapter<C> {
    /// `config.bot_token` must already be validated by `BotConfig::load`.
    pub fn new(config: &DiscordConfig, ctx: Arc<C>) -> Self {
        Self {
            ctx,
            config: config.clone(),
        }
    }

    /// Connect to Discord and keep reconnecting whenever the gateway drops.
    ///
    /// Never returns — runs for the lifetime of the process.
    pub async fn run(self) {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = self.connect(intents, "initial connect").await;

        loop {
            info!("Discord: gateway connecting");

            if let Err(e) = client.start().await {
                warn!("Discord: gateway error ({e}), reconnecting in 5s");
            } else {
                info!("Discord: gateway stopped cleanly, reconnecting in 5s");
            }

            tokio::time::sleep(Duration::from_secs(5)).await;

            client = self.connect(intents, "reconnect").await;
        }
    }

    /// Build a client, retrying every 30s until it succeeds.
    async fn connect(&self, intents: GatewayIntents, phase: &str) -> Client {
        loop {
            match self.build_client(intents).await {
                Ok(c) => break c,
                Err(e) => {
                    error!("Discord: {phase} failed ({e}), retrying in 30s");
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            }
        }
    }

    /// Build a fresh serenity `Client` with our event handler.
    async fn build_client(&self, intents: GatewayIntents) -> Result<Client, serenity::Error> {
        let shard_manager = Arc::new(OnceLock::new());
        let handler = DiscordHandler {
            ctx: Arc::clone(&self.ctx),
            config: self.config.clone(),
            shard_manager: Arc::clone(&shard_manager),
        };

        let client = Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await?;
        shard_manager.set(Arc::clone(&client.shard_manager)).ok();
        Ok(client)
    }
}
