//! # Copy Feedback State
//!
//! Timer-agnostic state machine behind the "copied" indicator of a block.
//! Drivers (the tokio controller natively, `gloo-timers` in the browser)
//! own the actual delayed callback and hand the token back on expiry.
//!
//! ```text
//!            confirm()              revert(token)
//!   Idle ─────────────────► Copied ───────────────► Idle
//!     │                       │ ▲
//!     │ fail()                │ │ confirm() / fail()  (new token,
//!     ▼                       ▼ │                      old one is stale)
//!   Failed ─────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the copy confirmation stays visible
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_millis(2000);

/// Visual state of a block's copy button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    /// Nothing to show
    #[default]
    Idle,
    /// Text reached the clipboard
    Copied,
    /// Clipboard write failed
    Failed,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Idle => "idle",
            CopyStatus::Copied => "copied",
            CopyStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one pending reversion; superseded tokens are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedbackToken(u64);

/// Copy feedback for a single block instance
#[derive(Debug, Default)]
pub struct CopyFeedback {
    status: CopyStatus,
    pending: Option<FeedbackToken>,
    generation: u64,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Copied`, replacing any pending reversion
    pub fn confirm(&mut self) -> FeedbackToken {
        self.enter(CopyStatus::Copied)
    }

    /// Enter `Failed`, replacing any pending reversion
    pub fn fail(&mut self) -> FeedbackToken {
        self.enter(CopyStatus::Failed)
    }

    fn enter(&mut self, status: CopyStatus) -> FeedbackToken {
        self.generation += 1;
        let token = FeedbackToken(self.generation);
        self.status = status;
        self.pending = Some(token);
        token
    }

    /// Return to `Idle` if `token` is still the pending one.
    ///
    /// Returns whether the state changed.
    pub fn revert(&mut self, token: FeedbackToken) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        self.status = CopyStatus::Idle;
        true
    }

    /// Drop any pending reversion and go back to `Idle`
    pub fn reset(&mut self) {
        self.pending = None;
        self.status = CopyStatus::Idle;
    }

    pub fn status(&self) -> CopyStatus {
        self.status
    }

    /// True while the "copied" confirmation is showing
    pub fn is_active(&self) -> bool {
        self.status == CopyStatus::Copied
    }

    /// Token of the reversion currently waiting to fire
    pub fn pending(&self) -> Option<FeedbackToken> {
        self.pending
    }
}
