use explains_core::BotConfig;
use explains_discord::CommandContext;
use explains_engine::Explainer;

/// Central shared state — passed as `Arc<AppState>` to the Discord adapter.
pub struct AppState {
    pub config: BotConfig,
    pub explainer: Explainer,
}

impl AppState {
    pub fn new(config: BotConfig, explainer: Explainer) -> Self {
        Self { config, explainer }
    }
}

impl CommandContext for AppState {
    fn prefix(&self) -> &str {
        &self.config.discord.prefix
    }

    fn explainer(&self) -> &Explainer {
        &self.explainer
    }
}
