//! # docs-core
//!
//! Core types and state machines for the gateway-docs code-sample widget.
//!
//! This crate provides:
//! - `CodeSampleSet` and the variant label table
//! - `SampleSelector` for per-block variant switching
//! - `CopyFeedback` (timer-agnostic) and `CopyFeedbackController` (tokio timers)
//! - `Clipboard` and `DiagramRenderer` traits for external collaborators
//! - `DiagramPanel` with source fallback on engine failure
//! - `DocPage` / `PageCatalog` static content and mounted `PageView`s
//! - `WidgetError` for typed error handling
//!
//! The `runtime` feature (default) enables the tokio-driven controller and
//! page views. Disable it for wasm targets.
//!
//! ## Example
//!
//! ```rust,ignore
//! use docs_core::{CodeSampleSet, CopyFeedbackController, MemoryClipboard, SampleSelector};
//! use std::sync::Arc;
//!
//! let samples = CodeSampleSet::new([("curl", "curl -X POST ..."), ("nodejs", "await ...")])?;
//! let mut selector = SampleSelector::mount(samples);
//! selector.select_variant("nodejs");
//!
//! let controller = CopyFeedbackController::new(Arc::new(MemoryClipboard::new()));
//! controller.mount("blk1");
//! controller.copy("blk1", selector.active_body()).await?;
//! assert!(controller.is_active("blk1"));
//! ```

pub mod clipboard;
#[cfg(feature = "runtime")]
pub mod controller;
pub mod diagram;
pub mod error;
pub mod feedback;
pub mod page;
pub mod sample;
pub mod selector;
#[cfg(feature = "runtime")]
pub mod view;

// Re-exports for convenience
pub use clipboard::{BoxedClipboard, Clipboard, MemoryClipboard};
#[cfg(feature = "runtime")]
pub use controller::CopyFeedbackController;
pub use diagram::{
    render_diagram, BoxedDiagramRenderer, DiagramPanel, DiagramRenderer, DiagramState,
    PanelContent,
};
pub use error::{WidgetError, WidgetResult};
pub use feedback::{CopyFeedback, CopyStatus, FeedbackToken, COPY_FEEDBACK_WINDOW};
pub use page::{CodeBlock, DiagramBlock, DocPage, PageCatalog};
pub use sample::{variant_label, CodeSampleSet, Variant, VARIANT_LABELS};
pub use selector::{SampleSelector, Tab};
#[cfg(feature = "runtime")]
pub use view::{BlockSnapshot, PageView, ViewSnapshot};
