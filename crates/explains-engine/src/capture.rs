//! Process output channel with scoped capture.
//!
//! Engines report progress and results by printing to an [`OutputChannel`]
//! instead of returning them. [`OutputChannel::capture`] redirects the channel
//! into a fresh in-memory buffer for the lifetime of a [`CaptureScope`].
//!
//! Invariants:
//! - at most one scope is open per channel; `capture()` waits for the
//!   current one to close
//! - the previous target is restored when the scope is finished or dropped,
//!   including early returns and panics inside the protected region
//! - restoration happens before the next waiter can open its scope

use std::fmt;
use std::io::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::debug;

/// Destination for text written to an [`OutputChannel`].
pub trait OutputSink: Send + Sync {
    fn write_str(&self, s: &str);
}

/// Writes straight to the process's standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_str(&self, s: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(s.as_bytes());
        let _ = out.flush();
    }
}

/// Append-only in-memory buffer. Also usable as a channel's default target.
#[derive(Default)]
pub struct BufferSink {
    buf: Mutex<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> String {
        lock(&self.buf).clone()
    }

    fn take(&self) -> String {
        std::mem::take(&mut *lock(&self.buf))
    }
}

impl OutputSink for BufferSink {
    fn write_str(&self, s: &str) {
        lock(&self.buf).push_str(s);
    }
}

/// A shared text output channel whose target can be temporarily redirected.
pub struct OutputChannel {
    target: Mutex<Arc<dyn OutputSink>>,
    owner: tokio::sync::Mutex<()>,
}

impl OutputChannel {
    pub fn new(default: Arc<dyn OutputSink>) -> Self {
        Self {
            target: Mutex::new(default),
            owner: tokio::sync::Mutex::new(()),
        }
    }

    /// The process-wide channel, backed by stdout.
    pub fn global() -> Arc<OutputChannel> {
        static GLOBAL: OnceLock<Arc<OutputChannel>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(OutputChannel::new(Arc::new(StdoutSink)))))
    }

    pub fn write_str(&self, s: &str) {
        // Held while writing so a write never lands in a buffer that was
        // already swapped out and snapshotted.
        let target = lock(&self.target);
        target.write_str(s);
    }

    /// Lets `write!`/`writeln!` target the channel directly.
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&args.to_string()),
        }
    }

    /// Whether a capture scope currently owns the channel.
    pub fn is_captured(&self) -> bool {
        self.owner.try_lock().is_err()
    }

    /// Wait for exclusive ownership and redirect the channel into a new buffer.
    pub async fn capture(&self) -> CaptureScope<'_> {
        let owner = self.owner.lock().await;
        let buffer = Arc::new(BufferSink::new());
        let previous = {
            let mut target = lock(&self.target);
            std::mem::replace(&mut *target, Arc::clone(&buffer) as Arc<dyn OutputSink>)
        };
        debug!("output channel redirected");
        CaptureScope {
            channel: self,
            buffer,
            previous: Some(previous),
            _owner: owner,
        }
    }

    fn restore(&self, previous: Arc<dyn OutputSink>) {
        *lock(&self.target) = previous;
        debug!("output channel restored");
    }
}

/// Exclusive redirection of an [`OutputChannel`]; see the module docs.
#[must_use = "dropping the scope immediately restores the channel"]
pub struct CaptureScope<'a> {
    channel: &'a OutputChannel,
    buffer: Arc<BufferSink>,
    previous: Option<Arc<dyn OutputSink>>,
    // Released after `Drop::drop` has restored the target.
    _owner: tokio::sync::MutexGuard<'a, ()>,
}

impl CaptureScope<'_> {
    /// Restore the previous target and return everything captured.
    pub fn finish(mut self) -> String {
        if let Some(previous) = self.previous.take() {
            self.channel.restore(previous);
        }
        self.buffer.take()
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.channel.restore(previous);
        }
    }
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_with_default() -> (Arc<BufferSink>, OutputChannel) {
        let default = Arc::new(BufferSink::new());
        let channel = OutputChannel::new(Arc::clone(&default) as Arc<dyn OutputSink>);
        (default, channel)
    }

    #[tokio::test]
    async fn capture_collects_writes_and_restores() {
        let (default, channel) = channel_with_default();
        channel.write_str("before ");

        let scope = channel.capture().await;
        writeln!(channel, "captured {}", 42);
        let captured = scope.finish();

        channel.write_str("after");
        assert_eq!(captured, "captured 42\n");
        assert_eq!(default.contents(), "before after");
        assert!(!channel.is_captured());
    }

    #[tokio::test]
    async fn failing_call_still_restores() {
        async fn failing(out: &OutputChannel) -> Result<(), String> {
            out.write_str("partial");
            Err("boom".to_string())
        }

        async fn protected(channel: &OutputChannel) -> Result<String, String> {
            let scope = channel.capture().await;
            failing(channel).await?;
            Ok(scope.finish())
        }

        let (default, channel) = channel_with_default();
        assert!(protected(&channel).await.is_err());

        channel.write_str("still here");
        assert_eq!(default.contents(), "still here");
        assert!(!channel.is_captured());
    }

    #[tokio::test]
    async fn panic_inside_scope_restores() {
        let (default, channel) = channel_with_default();
        let channel = Arc::new(channel);

        let inner = Arc::clone(&channel);
        let res = tokio::spawn(async move {
            let _scope = inner.capture().await;
            inner.write_str("lost");
            panic!("engine exploded");
        })
        .await;
        assert!(res.is_err());

        channel.write_str("ok");
        assert_eq!(default.contents(), "ok");
        // A fresh scope can still be opened.
        let scope = channel.capture().await;
        assert_eq!(scope.finish(), "");
    }

    #[tokio::test]
    async fn second_capture_waits_for_first() {
        let (_default, channel) = channel_with_default();
        let scope = channel.capture().await;
        assert!(channel.is_captured());

        let waiting = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            channel.capture(),
        )
        .await;
        assert!(waiting.is_err(), "second scope opened while first was live");

        drop(scope);
        let scope = channel.capture().await;
        drop(scope);
    }
}
