//! Result sinks: the out-of-band channel back to the caller.
//!
//! A [`ResultSink`] delivers a [`CallResult`] to whoever issued the call
//! identified by a [`CallId`]. Delivery is fire-and-forget: the dispatcher
//! never awaits or inspects it, so sinks log their own failures.
//!
//! # Adapters
//!
//! ```text
//! Dispatcher ─┬─► ChannelSink ─► mpsc::UnboundedSender<ReportedResult> ─► host task
//!             ├─► JsonLineSink ─► one JSON object per line ─► stdout / any Write
//!             └─► NullSink (drop)
//! ```

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::call::CallId;
use crate::error::Result;
use crate::result::CallResult;

/// Destination for call results.
pub trait ResultSink: Send + Sync + 'static {
    /// Deliver `result` to the caller of `call_id`.
    fn send_result(&self, call_id: &CallId, result: CallResult);

    /// Deliver an error result carrying `message`.
    fn report_error(&self, call_id: &CallId, message: &str) {
        self.send_result(call_id, CallResult::error(message));
    }
}

/// A result addressed to a call, as delivered by [`ChannelSink`] and
/// serialized by [`JsonLineSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedResult {
    /// Call the result belongs to.
    pub call_id: CallId,
    /// The result itself.
    pub result: CallResult,
}

/// Sink that drops every result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn send_result(&self, call_id: &CallId, result: CallResult) {
        tracing::debug!(
            call_id = %call_id,
            code = result.code(),
            "No result sink configured, dropping result"
        );
    }
}

/// Sink that forwards results over an unbounded tokio channel.
///
/// Sending never blocks, so it is safe to use from synchronous handlers
/// running on any thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ReportedResult>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<ReportedResult>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReportedResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn send_result(&self, call_id: &CallId, result: CallResult) {
        let reported = ReportedResult {
            call_id: call_id.clone(),
            result,
        };
        if self.tx.send(reported).is_err() {
            tracing::warn!(call_id = %call_id, "Result receiver dropped, result discarded");
        }
    }
}

/// Sink that writes each result as a single JSON line.
///
/// Uses an explicit `\n` and flushes after every line so a reading parent
/// process always sees complete messages.
pub struct JsonLineSink<W: Write + Send + 'static> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> JsonLineSink<W> {
    /// Create a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn write_line(&self, reported: &ReportedResult) -> Result<()> {
        let json = serde_json::to_string(reported)?;
        // A poisoned lock only means another writer panicked mid-line.
        let mut handle = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        handle.write_all(json.as_bytes())?;
        handle.write_all(b"\n")?;
        handle.flush()?;
        Ok(())
    }
}

impl JsonLineSink<std::io::Stdout> {
    /// Sink writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> ResultSink for JsonLineSink<W> {
    fn send_result(&self, call_id: &CallId, result: CallResult) {
        let reported = ReportedResult {
            call_id: call_id.clone(),
            result,
        };
        if let Err(e) = self.write_line(&reported) {
            tracing::error!(call_id = %call_id, "Failed to write result: {}", e);
        }
    }
}
