//! # Diagram Panel
//!
//! Renders a textual diagram definition (mermaid, plantuml, ...) through an
//! external engine. Diagrams are illustrative: an engine failure never
//! reaches the page, the panel shows the raw definition instead.
//!
//! ```text
//!              render() ok
//!   Rendering ─────────────► Rendered { svg }
//!       │
//!       │ render() err / empty definition
//!       ▼
//!    Failed { reason }   (panel shows the definition verbatim)
//! ```

use crate::error::{WidgetError, WidgetResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// External diagram rendering engine
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render a definition to SVG markup
    async fn render(&self, definition: &str) -> WidgetResult<String>;

    /// Engine name (for logging)
    fn engine_name(&self) -> &'static str;
}

/// Type alias for a shared renderer (dynamic dispatch)
pub type BoxedDiagramRenderer = Arc<dyn DiagramRenderer>;

/// Lifecycle of one mounted panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DiagramState {
    Rendering,
    Rendered { svg: String },
    Failed { reason: String },
}

/// What the panel puts on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelContent<'a> {
    /// Still waiting on the engine
    Pending,
    /// Engine output
    Svg(&'a str),
    /// Raw definition text, shown when rendering failed
    Source(&'a str),
}

/// One mounted diagram panel
#[derive(Debug, Clone, Serialize)]
pub struct DiagramPanel {
    definition: String,
    #[serde(flatten)]
    state: DiagramState,
}

impl DiagramPanel {
    /// Mount a panel in the `Rendering` state
    pub fn mount(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            state: DiagramState::Rendering,
        }
    }

    /// Drive the panel to a terminal state.
    ///
    /// Only the first call talks to the engine; later calls return the
    /// terminal state reached for this mount.
    pub async fn render(&mut self, renderer: &dyn DiagramRenderer) -> &DiagramState {
        if self.is_terminal() {
            return &self.state;
        }

        if self.definition.trim().is_empty() {
            self.state = DiagramState::Failed {
                reason: WidgetError::InvalidDefinition("definition is empty".to_string())
                    .to_string(),
            };
            return &self.state;
        }

        self.state = match renderer.render(&self.definition).await {
            Ok(svg) => {
                debug!(
                    "Rendered diagram with {}: {} bytes",
                    renderer.engine_name(),
                    svg.len()
                );
                DiagramState::Rendered { svg }
            }
            Err(e) => {
                warn!(
                    "Diagram engine {} failed, showing source: {}",
                    renderer.engine_name(),
                    e
                );
                DiagramState::Failed {
                    reason: e.to_string(),
                }
            }
        };

        &self.state
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    /// The definition exactly as supplied
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// True once `Rendered` or `Failed`
    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, DiagramState::Rendering)
    }

    pub fn content(&self) -> PanelContent<'_> {
        match &self.state {
            DiagramState::Rendering => PanelContent::Pending,
            DiagramState::Rendered { svg } => PanelContent::Svg(svg),
            DiagramState::Failed { .. } => PanelContent::Source(&self.definition),
        }
    }
}

/// Mount a panel for `definition` and render it in one step
pub async fn render_diagram(
    definition: impl Into<String>,
    renderer: &dyn DiagramRenderer,
) -> DiagramPanel {
    let mut panel = DiagramPanel::mount(definition);
    panel.render(renderer).await;
    panel
}
