//! # System Clipboard
//!
//! `Clipboard` implementation that pipes text into the host's clipboard
//! utility. Used by the local preview server so "copy" on a sample lands in
//! the developer's real clipboard.

use crate::config::ClipboardBackend;
use async_trait::async_trait;
use docs_core::{BoxedClipboard, Clipboard, MemoryClipboard, WidgetError, WidgetResult};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Clipboard backed by an external command reading from stdin
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Use an explicit command, e.g. `("xclip", ["-selection", "clipboard"])`
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Pick the clipboard utility for the current platform
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::<String>::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::<String>::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::<String>::new())
        } else {
            Self::new("xclip", ["-selection", "clipboard"])
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn error(&self, message: impl Into<String>) -> WidgetError {
        WidgetError::Clipboard {
            backend: self.program.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> WidgetResult<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.error(format!("failed to start: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.error("stdin not captured"))?;
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| self.error(format!("write failed: {}", e)))?;
        // Close stdin so the utility sees EOF
        drop(stdin);

        let status = child
            .wait()
            .await
            .map_err(|e| self.error(format!("wait failed: {}", e)))?;

        if !status.success() {
            return Err(self.error(format!("exited with {}", status)));
        }

        debug!("Copied {} bytes via {}", text.len(), self.program);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "system"
    }
}

/// Build the clipboard selected by configuration
pub fn clipboard_for(backend: ClipboardBackend) -> BoxedClipboard {
    match backend {
        ClipboardBackend::System => {
            let clipboard = CommandClipboard::detect();
            info!("Using system clipboard via {}", clipboard.program());
            Arc::new(clipboard)
        }
        ClipboardBackend::Memory => {
            info!("Using in-memory clipboard");
            Arc::new(MemoryClipboard::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_success() {
        let clipboard = CommandClipboard::new("cat", Vec::<String>::new());
        clipboard.write_text("curl https://sandbox.gateway.test").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_nonzero_exit() {
        let clipboard = CommandClipboard::new("false", Vec::<String>::new());
        let err = clipboard.write_text("A").await.unwrap_err();
        assert!(matches!(err, WidgetError::Clipboard { .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let clipboard = CommandClipboard::new("definitely-not-a-clipboard-tool", Vec::<String>::new());
        let err = clipboard.write_text("A").await.unwrap_err();
        match err {
            WidgetError::Clipboard { backend, message } => {
                assert_eq!(backend, "definitely-not-a-clipboard-tool");
                assert!(message.contains("failed to start"));
            }
            other => panic!("expected Clipboard error, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_selection() {
        assert_eq!(clipboard_for(ClipboardBackend::Memory).backend_name(), "memory");
        assert_eq!(clipboard_for(ClipboardBackend::System).backend_name(), "system");
    }
}
