use std::sync::Arc;

use clap::Parser;
use tracing::info;

use explains_core::BotConfig;
use explains_discord::DiscordAdapter;
use explains_engine::{ConfigSource, Explainer, HttpEngine, OutputChannel};

mod app;

/// Discord bot answering `!explains <question>` through an explanation engine.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to explains.toml (default: ~/.explains/explains.toml).
    #[arg(long, env = "EXPLAINS_CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with engine output on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "explains_bot=info,explains_discord=info,explains_engine=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = BotConfig::load(args.config.as_deref())?;

    let engine_env = config.engine.config_env.clone();
    info!(prefix = %config.discord.prefix, engine_config_env = %engine_env, "starting explains bot");

    let explainer = Explainer::new(
        OutputChannel::global(),
        Arc::new(HttpEngine::new()),
        ConfigSource::Env(engine_env),
    );

    let state = Arc::new(app::AppState::new(config, explainer));
    let adapter = DiscordAdapter::new(&state.config.discord, Arc::clone(&state));
    adapter.run().await;

    Ok(())
}
