//! # Clipboard Trait
//!
//! Seam between the copy feedback controller and whatever actually holds
//! the copied text. Implementations: the in-memory clipboard below, the
//! system clipboard in `docs-platform`.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Clipboard (trait)              │
//! │  ├── write_text()                           │
//! │  └── backend_name()                         │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!           ┌───────────┴───────────┐
//!   ┌───────┴────────┐     ┌────────┴────────┐
//!   │MemoryClipboard │     │CommandClipboard │
//!   │   (core)       │     │  (platform)     │
//!   └────────────────┘     └─────────────────┘
//! ```

use crate::error::{WidgetError, WidgetResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Destination for copied sample text
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Write `text` to the clipboard, resolving once the write is confirmed
    async fn write_text(&self, text: &str) -> WidgetResult<()>;

    /// Backend name (for logging and error messages)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared clipboard (dynamic dispatch)
pub type BoxedClipboard = Arc<dyn Clipboard>;

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
    failing: bool,
}

/// Process-local clipboard.
///
/// Used headless (previews, tests). Can be switched into a failing mode to
/// exercise the error path.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails
    pub fn failing() -> Self {
        let clipboard = Self::new();
        clipboard.set_failing(true);
        clipboard
    }

    /// Toggle failure mode
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Last successfully written text
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of write attempts, failed ones included
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> WidgetResult<()> {
        let mut state = self.lock();
        state.writes += 1;

        if state.failing {
            return Err(WidgetError::Clipboard {
                backend: self.backend_name().to_string(),
                message: "clipboard unavailable".to_string(),
            });
        }

        state.contents = Some(text.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_write() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.write_text("curl https://api.example.com").await.unwrap();
        assert_eq!(
            clipboard.contents().as_deref(),
            Some("curl https://api.example.com")
        );
        assert_eq!(clipboard.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_clipboard_failure() {
        let clipboard = MemoryClipboard::failing();
        let err = clipboard.write_text("A").await.unwrap_err();

        assert!(matches!(err, WidgetError::Clipboard { .. }));
        assert_eq!(clipboard.contents(), None);
        assert_eq!(clipboard.write_count(), 1);

        clipboard.set_failing(false);
        clipboard.write_text("B").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_clones_share_contents() {
        let clipboard = MemoryClipboard::new();
        let boxed: BoxedClipboard = Arc::new(clipboard.clone());

        boxed.write_text("shared").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("shared"));
        assert_eq!(boxed.backend_name(), "memory");
    }
}
