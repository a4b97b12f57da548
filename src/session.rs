//! The generation state machine owned by the UI controller.
//!
//! A [`DesignSession`] tracks whether an attempt is in flight, the latest
//! progress snapshot, the last error, and the accumulated result history. It
//! is an explicit owned object meant to be passed into views, not a global;
//! each session has exactly one in-flight slot, so UI code must not submit
//! again while [`is_generating`](DesignSession::is_generating) is true.

use crate::client::DesignClient;
use crate::error::{DesignError, Result};
use crate::types::{DesignResult, GenerationRequest, StreamingProgressEvent};

/// Whether an attempt is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
}

/// Client-side state machine for design generation attempts.
#[derive(Debug, Default)]
pub struct DesignSession {
    phase: Phase,
    progress: Option<StreamingProgressEvent>,
    error: Option<String>,
    history: Vec<DesignResult>,
}

impl DesignSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    /// Latest progress snapshot, present only while generating.
    pub fn progress(&self) -> Option<&StreamingProgressEvent> {
        self.progress.as_ref()
    }

    /// Message from the most recent failed attempt, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// All committed results, most recent first.
    pub fn history(&self) -> &[DesignResult] {
        &self.history
    }

    /// The result of the most recent successful attempt.
    pub fn current_result(&self) -> Option<&DesignResult> {
        self.history.first()
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Transition to generating. Rejected without a transition when the
    /// request has no images or another attempt is already in flight.
    pub fn begin(&mut self, request: &GenerationRequest) -> Result<()> {
        if self.phase == Phase::Generating {
            return Err(DesignError::Validation(
                "A generation attempt is already in flight".to_string(),
            ));
        }
        if request.images.is_empty() {
            return Err(DesignError::Validation(
                "At least one room image is required".to_string(),
            ));
        }
        self.phase = Phase::Generating;
        self.error = None;
        self.progress = None;
        Ok(())
    }

    /// Replace the progress snapshot. Ignored while idle, so a stray late
    /// event can never overwrite a committed outcome.
    pub fn record_progress(&mut self, event: StreamingProgressEvent) {
        if self.phase == Phase::Generating {
            self.progress = Some(event);
        }
    }

    /// Commit a successful result: front-insert into history, clear the
    /// transient error and progress, return to idle. Ignored while idle so a
    /// duplicate commit cannot double-append.
    pub fn commit_result(&mut self, result: DesignResult) {
        if self.phase != Phase::Generating {
            return;
        }
        self.history.insert(0, result);
        self.error = None;
        self.progress = None;
        self.phase = Phase::Idle;
    }

    /// Commit a failed attempt: record the message, clear progress, return
    /// to idle. History is untouched. Ignored while idle, like the other
    /// terminal transitions.
    pub fn commit_error(&mut self, message: impl Into<String>) {
        if self.phase != Phase::Generating {
            return;
        }
        self.error = Some(message.into());
        self.progress = None;
        self.phase = Phase::Idle;
    }

    /// Clear transient error/progress state. Result history is never cleared
    /// here; it lives for the whole session.
    pub fn reset(&mut self) {
        self.error = None;
        self.progress = None;
    }

    // ── Orchestration ───────────────────────────────────────────────

    /// Drive one full attempt against `client`, keeping this session's
    /// snapshot updated and committing the terminal outcome.
    ///
    /// `on_event` observes each progress event as it is dispatched, before
    /// the snapshot is replaced. The terminal error, if any, is both recorded
    /// in the session and returned.
    pub async fn run<F>(
        &mut self,
        client: &DesignClient,
        request: &GenerationRequest,
        mut on_event: F,
    ) -> Result<()>
    where
        F: FnMut(&StreamingProgressEvent),
    {
        self.begin(request)?;

        let progress = &mut self.progress;
        let outcome = client
            .generate_design(request, |ev| {
                on_event(&ev);
                *progress = Some(ev);
            })
            .await;

        match outcome {
            Ok(result) => {
                self.commit_result(result);
                Ok(())
            }
            Err(e) => {
                self.commit_error(e.to_string());
                Err(e)
            }
        }
    }
}
