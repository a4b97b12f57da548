//! Incremental decoding of the designer service's event stream.
//!
//! The service answers a generation request with a long-lived response body
//! carrying newline-separated frames of the form `data: {...json...}`. Frames
//! arrive split across arbitrary chunk boundaries, so decoding happens in
//! layers: [`LineBuffer`] reassembles complete lines from raw byte chunks,
//! [`classify_line`] turns each line into a tagged [`FrameOutcome`], and
//! [`consume_stream`] runs the whole loop over a chunk stream to its terminal
//! outcome.

use std::time::Duration;

use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::{DesignError, Result};
use crate::types::StreamingProgressEvent;

/// Literal prefix marking an event frame; anything else on a line is ignored.
const DATA_PREFIX: &str = "data: ";

/// Reassembles complete text lines from a chunked byte stream.
///
/// Bytes are buffered and split on `\n` before any UTF-8 decoding, so a
/// multi-byte character split across two chunks stays in the buffer until its
/// line completes (`\n` never occurs inside a multi-byte UTF-8 sequence).
/// Whatever remains unterminated when the stream ends is discarded — an
/// incomplete tail cannot be a complete frame.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one chunk and return every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the \n itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Bytes currently held back waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Classification of one decoded line.
///
/// The three distinct stream outcomes (forward, capture, abort) are explicit
/// variants rather than caught exceptions, so callers match instead of
/// guessing which failures are recoverable.
#[derive(Debug)]
pub enum FrameOutcome {
    /// A progress frame to forward to the caller's callback.
    Progress(StreamingProgressEvent),
    /// The terminal success payload; consumption continues draining.
    Completed(Value),
    /// A terminal error reported by the server, message verbatim.
    Failed(String),
    /// Blank separator, comment, or malformed frame; dropped.
    Skip,
}

/// Classify one line from the stream.
///
/// Non-`data: ` lines and frames whose JSON fails to parse are [`Skip`]
/// (malformed frames are logged and dropped rather than aborting an otherwise
/// healthy stream). A payload with an `error` field is [`Failed`]; a payload
/// with `status == "completed"` and `success == true` is [`Completed`];
/// everything else is [`Progress`].
///
/// [`Skip`]: FrameOutcome::Skip
/// [`Failed`]: FrameOutcome::Failed
/// [`Completed`]: FrameOutcome::Completed
/// [`Progress`]: FrameOutcome::Progress
pub fn classify_line(line: &str) -> FrameOutcome {
    let Some(raw) = line.strip_prefix(DATA_PREFIX) else {
        return FrameOutcome::Skip;
    };

    let payload: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[roomdesigner-rs] Dropping malformed frame: {}", e);
            return FrameOutcome::Skip;
        }
    };

    if let Some(err) = payload.get("error").filter(|v| !v.is_null()) {
        let message = err
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| err.to_string());
        return FrameOutcome::Failed(message);
    }

    let status = payload.get("status").and_then(|v| v.as_str()).unwrap_or("");
    let success = payload
        .get("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if status == "completed" && success {
        return FrameOutcome::Completed(payload);
    }

    FrameOutcome::Progress(StreamingProgressEvent {
        status: status.to_string(),
        message: payload
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        step: payload
            .get("step")
            .and_then(|v| v.as_u64())
            .and_then(|s| u32::try_from(s).ok()),
        data: payload.get("data").cloned(),
    })
}

/// Consume a chunked byte stream to its terminal outcome.
///
/// Each chunk read is guarded by `idle_timeout`; expiry fails the attempt
/// with [`DesignError::Timeout`]. Progress frames are dispatched to
/// `on_progress` synchronously, in arrival order. The first completed frame
/// wins and the stream is drained to completion afterwards so the connection
/// is never left half-read; an error frame aborts immediately with
/// [`DesignError::Remote`]. A stream that ends without a completed frame
/// fails with [`DesignError::MissingResult`].
pub async fn consume_stream<S, B, F>(
    mut stream: S,
    idle_timeout: Duration,
    mut on_progress: F,
) -> Result<Value>
where
    S: Stream<Item = Result<B>> + Unpin,
    B: AsRef<[u8]>,
    F: FnMut(StreamingProgressEvent),
{
    let mut buffer = LineBuffer::new();
    let mut final_payload: Option<Value> = None;

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| DesignError::Timeout)?;

        let Some(chunk) = next else { break };
        let chunk = chunk?;

        for line in buffer.push(chunk.as_ref()) {
            match classify_line(&line) {
                FrameOutcome::Progress(ev) => on_progress(ev),
                FrameOutcome::Completed(payload) => {
                    // First completed frame wins; keep draining.
                    if final_payload.is_none() {
                        final_payload = Some(payload);
                    }
                }
                FrameOutcome::Failed(message) => return Err(DesignError::Remote(message)),
                FrameOutcome::Skip => {}
            }
        }
    }

    final_payload.ok_or(DesignError::MissingResult)
}
