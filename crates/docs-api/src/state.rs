//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the page catalog, mounted views, clipboard and diagram engine.

use crate::cache::CachedRenderer;
use chrono::{DateTime, Utc};
use docs_core::{
    BoxedClipboard, BoxedDiagramRenderer, PageCatalog, PageView, WidgetError, WidgetResult,
    COPY_FEEDBACK_WINDOW,
};
use docs_platform::{clipboard_for, ClipboardBackend, KrokiRenderer};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use uuid::Uuid;

/// Mounted views that outlive this are assumed abandoned
pub const DEFAULT_VIEW_TTL: Duration = Duration::from_secs(60 * 60);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit page catalog path (searched for when unset)
    pub pages_path: Option<PathBuf>,
    /// How long copy feedback stays visible
    pub copy_feedback: Duration,
    /// Views older than this are dropped by the sweeper
    pub view_ttl: Duration,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            pages_path: std::env::var("PAGES_PATH").ok().map(PathBuf::from),
            copy_feedback: std::env::var("COPY_FEEDBACK_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(COPY_FEEDBACK_WINDOW),
            view_ttl: std::env::var("VIEW_TTL_SECS")
                .ok()
                .and_then(|secs| secs.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_VIEW_TTL),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            pages_path: None,
            copy_feedback: COPY_FEEDBACK_WINDOW,
            view_ttl: DEFAULT_VIEW_TTL,
        }
    }
}

/// A view mounted through the API
#[derive(Clone)]
pub struct MountedView {
    pub view: Arc<PageView>,
    pub mounted_at: DateTime<Utc>,
}

/// Mounted views keyed by view id.
///
/// Clients are expected to `DELETE` their views; views that are never
/// unmounted are dropped by [`ViewRegistry::sweep`] once older than the
/// configured TTL.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: Arc<RwLock<HashMap<Uuid, MountedView>>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view and return its id
    pub fn insert(&self, view: PageView) -> (Uuid, MountedView) {
        let id = Uuid::new_v4();
        let mounted = MountedView {
            view: Arc::new(view),
            mounted_at: Utc::now(),
        };
        self.views
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, mounted.clone());
        (id, mounted)
    }

    /// Look up a view
    pub fn get(&self, view_id: &Uuid) -> WidgetResult<MountedView> {
        self.views
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(view_id)
            .cloned()
            .ok_or_else(|| view_not_found(view_id))
    }

    /// Remove a view. Its timers are cancelled once the last in-flight
    /// request holding it finishes.
    pub fn remove(&self, view_id: &Uuid) -> WidgetResult<MountedView> {
        self.views
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(view_id)
            .ok_or_else(|| view_not_found(view_id))
    }

    /// Drop views mounted at or before `cutoff`. Dropping the last handle of a
    /// view cancels its pending timers.
    pub fn sweep_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut views = self.views.write().unwrap_or_else(PoisonError::into_inner);
        let before = views.len();
        views.retain(|_, mounted| mounted.mounted_at > cutoff);
        before - views.len()
    }

    /// Drop views older than `max_age`
    pub fn sweep(&self, max_age: Duration) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        match Utc::now().checked_sub_signed(max_age) {
            Some(cutoff) => self.sweep_before(cutoff),
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.views.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn view_not_found(view_id: &Uuid) -> WidgetError {
    WidgetError::ViewNotFound {
        view_id: view_id.to_string(),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Static page content
    pub catalog: Arc<PageCatalog>,
    /// Mounted page views
    pub views: ViewRegistry,
    /// Clipboard used by every view
    pub clipboard: BoxedClipboard,
    /// Diagram engine (cached)
    pub renderer: BoxedDiagramRenderer,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        // Load page catalog
        let catalog = load_page_catalog(config.pages_path.as_ref())?;

        let clipboard = clipboard_for(ClipboardBackend::from_env()?);

        let kroki = KrokiRenderer::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Kroki: {}", e))?;
        tracing::info!("Diagram engine: {}", kroki.config().svg_endpoint());

        Ok(Self::from_parts(config, catalog, clipboard, Arc::new(kroki)))
    }

    /// Assemble state from explicit parts; the renderer gets wrapped in
    /// the render cache
    pub fn from_parts(
        config: AppConfig,
        catalog: PageCatalog,
        clipboard: BoxedClipboard,
        renderer: BoxedDiagramRenderer,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            views: ViewRegistry::new(),
            clipboard,
            renderer: Arc::new(CachedRenderer::new(renderer)),
            config,
        }
    }

    /// Periodically drop views older than `config.view_ttl`
    pub fn spawn_view_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let views = self.views.clone();
        let ttl = self.config.view_ttl;
        // Four sweeps per TTL, at most one per second
        let period = (ttl / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = views.sweep(ttl);
                if removed > 0 {
                    tracing::info!("Swept {} abandoned views", removed);
                }
            }
        })
    }

    /// Mount a new view of a page
    pub fn mount_view(&self, page_id: &str) -> WidgetResult<(Uuid, MountedView)> {
        let page = self.catalog.require(page_id)?;
        let view = PageView::mount_with_window(page, self.clipboard.clone(), self.config.copy_feedback);
        Ok(self.views.insert(view))
    }
}

/// Load page catalog from config file
fn load_page_catalog(explicit: Option<&PathBuf>) -> anyhow::Result<PageCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let catalog = PageCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} pages from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    // Try to load from config/pages.toml
    let config_paths = [
        "config/pages.toml",
        "../config/pages.toml",
        "../../config/pages.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = PageCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} pages from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No page catalog found, using empty catalog");
    Ok(PageCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_core::{CodeBlock, CodeSampleSet, DocPage, MemoryClipboard};

    struct NoEngine;

    #[async_trait::async_trait]
    impl docs_core::DiagramRenderer for NoEngine {
        async fn render(&self, _definition: &str) -> WidgetResult<String> {
            Err(WidgetError::Internal("no engine".into()))
        }

        fn engine_name(&self) -> &'static str {
            "none"
        }
    }

    fn state() -> AppState {
        let catalog = PageCatalog::new().with_page(DocPage::new("payments", "Payments").with_block(
            CodeBlock::new("request", CodeSampleSet::new([("curl", "A")]).unwrap()),
        ));
        AppState::from_parts(
            AppConfig::default(),
            catalog,
            Arc::new(MemoryClipboard::new()),
            Arc::new(NoEngine),
        )
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_mount_and_remove_view() {
        let state = state();
        let (id, mounted) = state.mount_view("payments").unwrap();

        assert_eq!(mounted.view.page_id(), "payments");
        assert_eq!(state.views.len(), 1);
        assert!(state.views.get(&id).is_ok());

        state.views.remove(&id).unwrap();
        assert!(state.views.is_empty());
        assert!(matches!(
            state.views.get(&id),
            Err(WidgetError::ViewNotFound { .. })
        ));
    }

    #[test]
    fn test_sweep_drops_only_old_views() {
        let state = state();
        let (old, _) = state.mount_view("payments").unwrap();

        assert_eq!(
            state.views.sweep_before(Utc::now() - chrono::Duration::hours(1)),
            0
        );
        assert!(state.views.get(&old).is_ok());

        assert_eq!(
            state.views.sweep_before(Utc::now() + chrono::Duration::seconds(1)),
            1
        );
        assert!(state.views.is_empty());

        state.mount_view("payments").unwrap();
        assert_eq!(state.views.sweep(DEFAULT_VIEW_TTL), 0);
        assert_eq!(state.views.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_sweeper_removes_abandoned_views() {
        let mut state = state();
        state.config.view_ttl = Duration::ZERO;
        state.mount_view("payments").unwrap();

        let sweeper = state.spawn_view_sweeper();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(state.views.is_empty());
        sweeper.abort();
    }

    #[test]
    fn test_mount_unknown_page() {
        assert!(matches!(
            state().mount_view("nope"),
            Err(WidgetError::PageNotFound { .. })
        ));
    }
}
