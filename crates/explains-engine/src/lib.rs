//! The `explains` pipeline: capture what an explanation engine prints,
//! strip citation markers from it, hand the result back to the caller.
//!
//! - [`capture`]: the process output channel and its RAII capture scope
//! - [`engine`]: the engine trait and the HTTP chat-completions engine
//! - [`sanitize`]: citation marker removal
//! - [`pipeline`]: capture → run → restore → sanitize, serialized

pub mod capture;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod sanitize;

pub use capture::{BufferSink, CaptureScope, OutputChannel, OutputSink, StdoutSink};
pub use engine::{ExplanationEngine, HttpEngine};
pub use error::{EngineError, ExplainsError};
pub use pipeline::{ConfigSource, Explainer};
pub use sanitize::sanitize_answer;
