//! Server-Sent-Events consumption for the streamed campaign-creation
//! endpoints.
//!
//! The backend frames progress as repeated `data: <json>\n` records over a
//! chunked response body. Chunks arrive in arbitrary sizes and may split a
//! frame mid-line (or mid-UTF-8-sequence), so [`FrameDecoder`] buffers bytes
//! until a full line is available and only then parses it. Each frame decodes
//! independently: a malformed payload fails that frame, never the stream.
//!
//! The wire `step` discriminator is polymorphic — a number on progress
//! updates, a string (`"done"`, `"error"`, `"awaiting_lead_confirmation"`)
//! on gate/terminal frames. [`CampaignEvent::from_value`] maps that into a
//! closed set of variants once, at the boundary, so consumers pattern-match
//! exhaustively instead of re-checking JSON types.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Notify;

use crate::types::{EmailVariant, Lead};

/// Errors terminating an event stream. Cancellation is deliberately distinct
/// from transport failure so callers can skip the error toast for
/// user-initiated stops.
#[derive(Debug, Error)]
pub enum SseError {
    #[error("stream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("stream cancelled")]
    Cancelled,
}

/// Cooperative cancellation handle for an in-flight stream.
///
/// Clonable; the controller keeps one end and may hand clones to whatever
/// drives the UI. `cancel` is idempotent and wakes any task currently
/// awaiting the next chunk.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled. Registers for notification
    /// before re-checking the flag so a concurrent `cancel` is never missed.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Lifecycle status of one backend progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Warning,
    Success,
    Error,
}

/// A numbered progress update frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressUpdate {
    pub step: u32,
    pub status: StepStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub log: Option<String>,
    /// Step 1 of the non-ICP flow attaches the generated copy for preview.
    #[serde(default)]
    pub variants: Option<Vec<EmailVariant>>,
    #[serde(default)]
    pub supersearch_list_id: Option<String>,
}

/// Payload of the mid-stream lead-approval gate frame. The server holds the
/// session open under `session_id` until `/api/confirm-leads` is called.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeadConfirmation {
    #[serde(default)]
    pub lead_list_id: String,
    #[serde(default)]
    pub leads: Vec<Lead>,
    pub session_id: String,
}

/// Payload of the terminal success frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CampaignCreated {
    pub campaign_id: String,
    #[serde(default)]
    pub lead_list_id: Option<String>,
    #[serde(default)]
    pub variants: Option<Vec<EmailVariant>>,
}

/// The closed set of frame kinds a campaign-creation stream can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignEvent {
    Progress(ProgressUpdate),
    AwaitingLeadConfirmation(LeadConfirmation),
    Done(CampaignCreated),
    Error { message: String },
}

impl CampaignEvent {
    /// Decode one frame payload, branching on the polymorphic `step`
    /// discriminator. Frames whose `status` is `"error"` are terminal
    /// failures regardless of what `step` carries.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` for unknown frame kinds, a missing
    /// discriminator, or a payload that does not match its kind's shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        struct Envelope<T> {
            data: T,
        }

        let step = value.get("step").cloned();
        match step {
            Some(serde_json::Value::String(kind)) => match kind.as_str() {
                "done" => {
                    let Envelope { data } =
                        serde_json::from_value::<Envelope<CampaignCreated>>(value)?;
                    Ok(CampaignEvent::Done(data))
                }
                "awaiting_lead_confirmation" => {
                    let Envelope { data } =
                        serde_json::from_value::<Envelope<LeadConfirmation>>(value)?;
                    Ok(CampaignEvent::AwaitingLeadConfirmation(data))
                }
                "error" => Ok(CampaignEvent::Error {
                    message: message_field(&value),
                }),
                other => Err(serde_json::Error::custom(format!(
                    "unknown frame kind '{other}'"
                ))),
            },
            Some(step) if step.is_u64() => {
                if status_field(&value) == Some("error") {
                    return Ok(CampaignEvent::Error {
                        message: message_field(&value),
                    });
                }
                serde_json::from_value(value).map(CampaignEvent::Progress)
            }
            _ => {
                if status_field(&value) == Some("error") {
                    return Ok(CampaignEvent::Error {
                        message: message_field(&value),
                    });
                }
                Err(serde_json::Error::custom("frame missing step discriminator"))
            }
        }
    }
}

fn status_field(value: &serde_json::Value) -> Option<&str> {
    value.get("status").and_then(serde_json::Value::as_str)
}

fn message_field(value: &serde_json::Value) -> String {
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown error")
        .to_owned()
}

/// One decoded `data:` line.
#[derive(Debug)]
pub enum Frame {
    Event(CampaignEvent),
    /// The line matched the `data:` marker but its payload did not decode.
    /// Only this frame is lost; the stream continues.
    Malformed {
        line: String,
        error: serde_json::Error,
    },
}

/// Incremental SSE line decoder.
///
/// Pure and transport-agnostic: feed it byte chunks in whatever sizes they
/// arrive, collect completed frames. Buffering is byte-level, so a multi-byte
/// UTF-8 character split across two chunks decodes correctly once its line
/// completes. Lines that do not start with `data:` (comments, keep-alives,
/// blank separators) are skipped without error.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the frames it completed, in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=newline).collect();
            decode_line(&line[..newline], &mut frames);
        }
        frames
    }

    /// Flush a trailing unterminated line at end of stream.
    pub fn finish(&mut self) -> Vec<Frame> {
        let rest = std::mem::take(&mut self.buf);
        let mut frames = Vec::new();
        if !rest.is_empty() {
            decode_line(&rest, &mut frames);
        }
        frames
    }
}

fn decode_line(line: &[u8], frames: &mut Vec<Frame>) {
    let Ok(text) = std::str::from_utf8(line) else {
        tracing::warn!(len = line.len(), "skipping non-UTF-8 stream line");
        return;
    };
    let text = text.trim_end_matches('\r');
    let Some(payload) = text.strip_prefix("data:") else {
        return;
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return;
    }
    match serde_json::from_str::<serde_json::Value>(payload).and_then(CampaignEvent::from_value) {
        Ok(event) => frames.push(Frame::Event(event)),
        Err(error) => frames.push(Frame::Malformed {
            line: text.to_owned(),
            error,
        }),
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>;

/// Pull-based frame source over a streaming HTTP response body.
///
/// Frames are yielded strictly in the order their bytes appeared; nothing is
/// batched, reordered, or retracted. Dropping the stream releases the
/// underlying transport.
pub struct EventStream {
    body: ByteStream,
    decoder: FrameDecoder,
    ready: VecDeque<Frame>,
    cancel: CancelToken,
    ended: bool,
}

impl EventStream {
    #[must_use]
    pub fn from_response(response: reqwest::Response, cancel: CancelToken) -> Self {
        Self {
            body: Box::pin(response.bytes_stream()),
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
            cancel,
            ended: false,
        }
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Next frame, `Ok(None)` on clean end of stream.
    ///
    /// # Errors
    ///
    /// [`SseError::Cancelled`] once the cancel token fires — including while
    /// suspended waiting on the transport — and [`SseError::Transport`] on a
    /// body read failure.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, SseError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(SseError::Cancelled);
            }
            if let Some(frame) = self.ready.pop_front() {
                return Ok(Some(frame));
            }
            if self.ended {
                return Ok(None);
            }

            tokio::select! {
                () = self.cancel.cancelled() => return Err(SseError::Cancelled),
                chunk = self.body.next() => match chunk {
                    Some(Ok(bytes)) => self.ready.extend(self.decoder.push(&bytes)),
                    Some(Err(e)) => return Err(SseError::Transport(e)),
                    None => {
                        self.ready.extend(self.decoder.finish());
                        self.ended = true;
                    }
                },
            }
        }
    }
}
