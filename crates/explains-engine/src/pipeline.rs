use std::sync::Arc;

use tracing::{info, warn, Instrument};
use uuid::Uuid;

use explains_core::EngineConfig;

use crate::capture::OutputChannel;
use crate::engine::ExplanationEngine;
use crate::error::ExplainsError;
use crate::sanitize::sanitize_answer;

/// Where each invocation gets its `EngineConfig` from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Parse the JSON held in this environment variable on every invocation.
    Env(String),
    /// Use a fixed configuration.
    Fixed(EngineConfig),
}

impl ConfigSource {
    fn build(&self) -> explains_core::Result<EngineConfig> {
        match self {
            ConfigSource::Env(var) => EngineConfig::from_env(var),
            ConfigSource::Fixed(cfg) => Ok(cfg.clone()),
        }
    }
}

/// Runs the engine with its output captured and returns the sanitized answer.
///
/// Invocations sharing an output channel are serialized by the channel's
/// capture scope, so each caller only ever sees its own engine's text.
pub struct Explainer {
    channel: Arc<OutputChannel>,
    engine: Arc<dyn ExplanationEngine>,
    config: ConfigSource,
}

impl Explainer {
    pub fn new(
        channel: Arc<OutputChannel>,
        engine: Arc<dyn ExplanationEngine>,
        config: ConfigSource,
    ) -> Self {
        Self {
            channel,
            engine,
            config,
        }
    }

    /// Explain `text` (the full command message, prefix and name included).
    pub async fn explain(&self, text: &str) -> Result<String, ExplainsError> {
        let invocation = Uuid::new_v4();
        let span = tracing::info_span!("explains", %invocation, engine = %self.engine.name());
        self.explain_inner(text).instrument(span).await
    }

    async fn explain_inner(&self, text: &str) -> Result<String, ExplainsError> {
        let scope = self.channel.capture().await;

        let config = self.config.build()?;
        let outcome = self.engine.run(config, text, &self.channel).await;

        let captured = scope.finish();

        match outcome {
            Ok(()) => {
                let answer = sanitize_answer(&captured);
                info!(
                    captured_bytes = captured.len(),
                    answer_bytes = answer.len(),
                    "explanation captured"
                );
                Ok(answer)
            }
            Err(e) => {
                warn!(error = %e, captured_bytes = captured.len(), "explanation engine failed");
                Err(e.into())
            }
        }
    }
}
