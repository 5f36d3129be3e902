//! # Kroki Diagram Engine
//!
//! `DiagramRenderer` backed by a Kroki server. The definition is POSTed as
//! plain text to `{base_url}/{diagram_type}/svg`; Kroki answers with SVG
//! markup or a 4xx carrying the engine's error message.

use crate::config::KrokiConfig;
use async_trait::async_trait;
use docs_core::{DiagramRenderer, WidgetError, WidgetResult};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Kroki-backed diagram renderer
pub struct KrokiRenderer {
    config: KrokiConfig,
    client: Client,
}

impl KrokiRenderer {
    /// Create a new renderer
    pub fn new(config: KrokiConfig) -> WidgetResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                WidgetError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> WidgetResult<Self> {
        let config = KrokiConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &KrokiConfig {
        &self.config
    }

    fn render_error(&self, message: impl Into<String>) -> WidgetError {
        WidgetError::Render {
            engine: self.engine_name().to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl DiagramRenderer for KrokiRenderer {
    #[instrument(skip(self, definition), fields(diagram_type = %self.config.diagram_type, len = definition.len()))]
    async fn render(&self, definition: &str) -> WidgetResult<String> {
        if definition.trim().is_empty() {
            return Err(WidgetError::InvalidDefinition(
                "definition is empty".to_string(),
            ));
        }

        let url = self.config.svg_endpoint();
        debug!("Rendering diagram via {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/plain")
            .header("Accept", "image/svg+xml")
            .body(definition.to_string())
            .send()
            .await
            .map_err(|e| WidgetError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WidgetError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Kroki error: status={}, body={}", status, body);
            return Err(self.render_error(format!("HTTP {}: {}", status, body.trim())));
        }

        if !body.contains("<svg") {
            return Err(self.render_error("response is not SVG"));
        }

        Ok(body)
    }

    fn engine_name(&self) -> &'static str {
        "kroki"
    }
}
