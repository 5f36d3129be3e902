//! # docs-api
//!
//! Local preview server for gateway-docs code-sample widgets.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Page content endpoints backed by `config/pages.toml`
//! - Mounted views driving variant selection and copy feedback
//! - Diagram rendering with source fallback and a render cache
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/pages` | List pages |
//! | GET | `/api/v1/pages/{page_id}` | Get page |
//! | POST | `/api/v1/pages/{page_id}/views` | Mount view |
//! | GET | `/api/v1/views/{view_id}` | View snapshot |
//! | DELETE | `/api/v1/views/{view_id}` | Unmount view |
//! | POST | `/api/v1/views/{view_id}/blocks/{block_id}/select` | Switch variant |
//! | POST | `/api/v1/views/{view_id}/blocks/{block_id}/copy` | Copy active variant |
//! | POST | `/api/v1/diagrams/render` | Render diagram |

pub mod cache;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
