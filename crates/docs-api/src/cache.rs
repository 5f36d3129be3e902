//! # Render Cache
//!
//! Diagram definitions are static page content, so the SVG an engine
//! produced for a definition stays valid for the life of the process.
//! `CachedRenderer` wraps any `DiagramRenderer` and remembers successful
//! renders keyed by the SHA-256 of the definition. Failures are not cached.

use async_trait::async_trait;
use docs_core::{BoxedDiagramRenderer, DiagramRenderer, WidgetResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Cache key for a diagram definition
pub fn definition_key(definition: &str) -> String {
    hex::encode(Sha256::digest(definition.as_bytes()))
}

/// Memoizing decorator around a diagram engine
pub struct CachedRenderer {
    inner: BoxedDiagramRenderer,
    entries: Mutex<HashMap<String, String>>,
}

impl CachedRenderer {
    pub fn new(inner: BoxedDiagramRenderer) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached SVGs
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DiagramRenderer for CachedRenderer {
    async fn render(&self, definition: &str) -> WidgetResult<String> {
        let key = definition_key(definition);

        let hit = self.entries().get(&key).cloned();
        if let Some(svg) = hit {
            debug!("Render cache hit: {}", &key[..12]);
            return Ok(svg);
        }

        let svg = self.inner.render(definition).await?;
        self.entries().insert(key, svg.clone());
        Ok(svg)
    }

    fn engine_name(&self) -> &'static str {
        self.inner.engine_name()
    }
}
