//! # gateway-docs
//!
//! Local preview server for the payment-gateway documentation widgets.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment variables
//! export PAGES_PATH=config/pages.toml
//! export KROKI_URL=http://localhost:8000
//! export CLIPBOARD_BACKEND=system
//!
//! # Run the server
//! gateway-docs
//! ```

use docs_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Pages loaded: {}", state.catalog.len());
    info!("Clipboard backend: {}", state.clipboard.backend_name());
    info!(
        "Copy feedback window: {}ms",
        state.config.copy_feedback.as_millis()
    );

    info!("View TTL: {}s", state.config.view_ttl.as_secs());
    let _sweeper = state.spawn_view_sweeper();

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Gateway docs preview on http://{}", addr);

    if !is_prod {
        info!("Pages: GET http://{}/api/v1/pages", addr);
        info!("Mount: POST http://{}/api/v1/pages/{{page_id}}/views", addr);
        info!("Diagrams: POST http://{}/api/v1/diagrams/render", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Gateway Docs Preview
  ━━━━━━━━━━━━━━━━━━━━
  Code-sample widget server
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
