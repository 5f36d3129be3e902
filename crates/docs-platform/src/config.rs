//! # Platform Configuration
//!
//! Configuration for the diagram engine and clipboard backend.
//! Values are loaded from environment variables (`.env` honoured).

use docs_core::WidgetError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Public Kroki instance used when `KROKI_URL` is not set
pub const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Kroki diagram engine configuration
#[derive(Debug, Clone)]
pub struct KrokiConfig {
    /// Base URL of the Kroki server (no trailing slash)
    pub base_url: String,

    /// Diagram language sent to Kroki (mermaid, plantuml, graphviz, ...)
    pub diagram_type: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl KrokiConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `KROKI_URL` (default `https://kroki.io`)
    /// - `KROKI_DIAGRAM_TYPE` (default `mermaid`)
    /// - `KROKI_TIMEOUT_SECS` (default `10`)
    pub fn from_env() -> Result<Self, WidgetError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("KROKI_URL").unwrap_or_else(|_| DEFAULT_KROKI_URL.to_string());
        let diagram_type = env::var("KROKI_DIAGRAM_TYPE").unwrap_or_else(|_| "mermaid".to_string());
        let timeout_secs = match env::var("KROKI_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                WidgetError::Configuration(format!("KROKI_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => 10,
        };

        let config = Self::new(base_url)
            .with_diagram_type(diagram_type)
            .with_timeout(Duration::from_secs(timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit base URL and defaults for the rest
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            diagram_type: "mermaid".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Builder: set diagram language
    pub fn with_diagram_type(mut self, diagram_type: impl Into<String>) -> Self {
        self.diagram_type = diagram_type.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check URL scheme and diagram type format
    pub fn validate(&self) -> Result<(), WidgetError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(WidgetError::Configuration(
                "KROKI_URL must start with http:// or https://".to_string(),
            ));
        }

        if self.diagram_type.is_empty()
            || !self
                .diagram_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(WidgetError::Configuration(format!(
                "invalid KROKI_DIAGRAM_TYPE: {:?}",
                self.diagram_type
            )));
        }

        if self.timeout.is_zero() {
            return Err(WidgetError::Configuration(
                "KROKI_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Endpoint that renders one definition to SVG
    pub fn svg_endpoint(&self) -> String {
        format!("{}/{}/svg", self.base_url, self.diagram_type)
    }
}

impl Default for KrokiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_KROKI_URL)
    }
}

/// Which clipboard the preview server writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    /// The host's system clipboard (wl-copy, xclip, pbcopy, clip)
    #[default]
    System,
    /// Process-local clipboard
    Memory,
}

impl ClipboardBackend {
    /// Read `CLIPBOARD_BACKEND` (default `system`)
    pub fn from_env() -> Result<Self, WidgetError> {
        dotenvy::dotenv().ok();

        match env::var("CLIPBOARD_BACKEND") {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClipboardBackend::System => "system",
            ClipboardBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for ClipboardBackend {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(ClipboardBackend::System),
            "memory" => Ok(ClipboardBackend::Memory),
            other => Err(WidgetError::Configuration(format!(
                "CLIPBOARD_BACKEND must be system or memory, got {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ClipboardBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kroki_config_defaults() {
        let config = KrokiConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.diagram_type, "mermaid");
        assert_eq!(config.svg_endpoint(), "http://localhost:8000/mermaid/svg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_kroki_config_validation() {
        assert!(KrokiConfig::new("localhost:8000").validate().is_err());
        assert!(KrokiConfig::default()
            .with_diagram_type("plant uml")
            .validate()
            .is_err());
        assert!(KrokiConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(KrokiConfig::default()
            .with_diagram_type("plantuml")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_clipboard_backend_parse() {
        assert_eq!("system".parse::<ClipboardBackend>().unwrap(), ClipboardBackend::System);
        assert_eq!(" Memory ".parse::<ClipboardBackend>().unwrap(), ClipboardBackend::Memory);
        assert!("x11".parse::<ClipboardBackend>().is_err());
        assert_eq!(ClipboardBackend::Memory.to_string(), "memory");
    }
}
