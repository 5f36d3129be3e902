//! # docs-platform
//!
//! Concrete external collaborators for gateway-docs widgets.
//!
//! This crate provides:
//!
//! 1. **KrokiRenderer** - `DiagramRenderer` backed by a Kroki server
//!    - Any diagram language Kroki supports (mermaid by default)
//!    - Engine errors surface as `WidgetError::Render`, so the
//!      `DiagramPanel` falls back to the raw definition
//!
//! 2. **CommandClipboard** - `Clipboard` backed by the host's clipboard tool
//!    - `wl-copy`, `xclip`, `pbcopy` or `clip`, detected per platform
//!    - Non-zero exits surface as `WidgetError::Clipboard`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docs_platform::{KrokiRenderer, clipboard_for, ClipboardBackend};
//! use docs_core::{render_diagram, PageView};
//!
//! let kroki = KrokiRenderer::from_env()?;
//! let panel = render_diagram("graph TD; Merchant-->Gateway", &kroki).await;
//!
//! let clipboard = clipboard_for(ClipboardBackend::from_env()?);
//! let view = PageView::mount(&page, clipboard);
//! view.copy("create-payment").await?;
//! ```

pub mod clipboard;
pub mod config;
pub mod kroki;

// Re-exports
pub use clipboard::{clipboard_for, CommandClipboard};
pub use config::{ClipboardBackend, KrokiConfig, DEFAULT_KROKI_URL};
pub use kroki::KrokiRenderer;
