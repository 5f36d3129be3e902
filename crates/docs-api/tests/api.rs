use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use docs_api::{create_router, AppConfig, AppState};
use docs_core::{DiagramRenderer, MemoryClipboard, PageCatalog, WidgetError, WidgetResult};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const PAGES: &str = include_str!("../../../config/pages.toml");

/// Accepts sequence diagrams, rejects everything else
struct SequenceOnlyEngine;

#[async_trait]
impl DiagramRenderer for SequenceOnlyEngine {
    async fn render(&self, definition: &str) -> WidgetResult<String> {
        if definition.trim_start().starts_with("sequenceDiagram") {
            Ok("<svg class=\"sequence\"></svg>".to_string())
        } else {
            Err(WidgetError::Render {
                engine: "test".to_string(),
                message: "unknown diagram type".to_string(),
            })
        }
    }

    fn engine_name(&self) -> &'static str {
        "test"
    }
}

fn server_with(clipboard: MemoryClipboard) -> TestServer {
    let state = AppState::from_parts(
        AppConfig::default(),
        PageCatalog::from_toml(PAGES).unwrap(),
        Arc::new(clipboard),
        Arc::new(SequenceOnlyEngine),
    );
    TestServer::new(create_router(state)).unwrap()
}

async fn mount(server: &TestServer, page_id: &str) -> String {
    let response = server
        .post(&format!("/api/v1/pages/{}/views", page_id))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["view_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_check() {
    let server = server_with(MemoryClipboard::new());
    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn lists_and_fetches_pages() {
    let server = server_with(MemoryClipboard::new());

    let pages = server.get("/api/v1/pages").await.json::<Value>();
    assert_eq!(pages["count"], 2);
    assert_eq!(pages["pages"][0]["id"], "payments-create");
    assert_eq!(pages["pages"][0]["blocks"], 2);

    let page = server.get("/api/v1/pages/webhooks").await.json::<Value>();
    assert_eq!(page["title"], "Webhooks");

    server
        .get("/api/v1/pages/chargebacks")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mounted_view_starts_on_default_variants() {
    let server = server_with(MemoryClipboard::new());
    let view_id = mount(&server, "webhooks").await;

    let view = server
        .get(&format!("/api/v1/views/{}", view_id))
        .await
        .json::<Value>();

    let block = &view["blocks"][0];
    assert_eq!(block["block_id"], "verify-signature");
    assert_eq!(block["active_key"], "nodejs");
    assert_eq!(block["active_label"], "Node.js");
    assert_eq!(block["copy_status"], "idle");
    assert_eq!(block["tabs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn select_switches_body_and_ignores_unknown_keys() {
    let server = server_with(MemoryClipboard::new());
    let view_id = mount(&server, "payments-create").await;
    let select = format!("/api/v1/views/{}/blocks/request/select", view_id);

    let response = server
        .post(&select)
        .json(&json!({ "variant": "nodejs" }))
        .await
        .json::<Value>();
    assert_eq!(response["accepted"], true);
    assert_eq!(response["block"]["active_key"], "nodejs");
    assert!(response["block"]["body"]
        .as_str()
        .unwrap()
        .contains("gateway.payments.create"));

    let response = server
        .post(&select)
        .json(&json!({ "variant": "cobol" }))
        .await
        .json::<Value>();
    assert_eq!(response["accepted"], false);
    assert_eq!(response["block"]["active_key"], "nodejs");

    server
        .post(&format!("/api/v1/views/{}/blocks/missing/select", view_id))
        .json(&json!({ "variant": "curl" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn copy_writes_active_body_and_flags_only_that_block() {
    let clipboard = MemoryClipboard::new();
    let server = server_with(clipboard.clone());
    let view_id = mount(&server, "payments-create").await;

    server
        .post(&format!("/api/v1/views/{}/blocks/request/select", view_id))
        .json(&json!({ "variant": "python" }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/v1/views/{}/blocks/request/copy", view_id))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["copy_status"], "copied");
    assert_eq!(body["reverts_in_ms"], 2000);

    assert!(clipboard
        .contents()
        .unwrap()
        .contains("gateway.Payment.create"));

    let view = server
        .get(&format!("/api/v1/views/{}", view_id))
        .await
        .json::<Value>();
    assert_eq!(view["blocks"][0]["copy_status"], "copied");
    assert_eq!(view["blocks"][1]["copy_status"], "idle");
}

#[tokio::test]
async fn views_do_not_share_state() {
    let server = server_with(MemoryClipboard::new());
    let first = mount(&server, "payments-create").await;
    let second = mount(&server, "payments-create").await;
    assert_ne!(first, second);

    server
        .post(&format!("/api/v1/views/{}/blocks/request/select", first))
        .json(&json!({ "variant": "nodejs" }))
        .await;
    server
        .post(&format!("/api/v1/views/{}/blocks/request/copy", first))
        .await;

    let other = server
        .get(&format!("/api/v1/views/{}", second))
        .await
        .json::<Value>();
    assert_eq!(other["blocks"][0]["active_key"], "curl");
    assert_eq!(other["blocks"][0]["copy_status"], "idle");
}

#[tokio::test]
async fn failed_clipboard_is_reported() {
    let server = server_with(MemoryClipboard::failing());
    let view_id = mount(&server, "payments-create").await;

    let response = server
        .post(&format!("/api/v1/views/{}/blocks/request/copy", view_id))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let view = server
        .get(&format!("/api/v1/views/{}", view_id))
        .await
        .json::<Value>();
    assert_eq!(view["blocks"][0]["copy_status"], "failed");
}

#[tokio::test(start_paused = true)]
async fn copy_feedback_reverts_after_window() {
    let server = server_with(MemoryClipboard::new());
    let view_id = mount(&server, "payments-create").await;

    server
        .post(&format!("/api/v1/views/{}/blocks/response/copy", view_id))
        .await
        .assert_status_ok();

    tokio::time::sleep(Duration::from_millis(2001)).await;

    let view = server
        .get(&format!("/api/v1/views/{}", view_id))
        .await
        .json::<Value>();
    assert_eq!(view["blocks"][1]["copy_status"], "idle");
}

#[tokio::test]
async fn unmount_removes_view() {
    let server = server_with(MemoryClipboard::new());
    let view_id = mount(&server, "payments-create").await;

    server
        .post(&format!("/api/v1/views/{}/blocks/request/copy", view_id))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/v1/views/{}", view_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/v1/views/{}", view_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/v1/views/{}", view_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/v1/views/not-a-uuid")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn diagram_renders_or_falls_back_to_source() {
    let server = server_with(MemoryClipboard::new());

    let rendered = server
        .post("/api/v1/diagrams/render")
        .json(&json!({ "definition": "sequenceDiagram\n  A->>B: hi" }))
        .await
        .json::<Value>();
    assert_eq!(rendered["state"], "rendered");
    assert_eq!(rendered["svg"], "<svg class=\"sequence\"></svg>");

    let definition = "graph TD\n  A-->B";
    let failed = server
        .post("/api/v1/diagrams/render")
        .json(&json!({ "definition": definition }))
        .await
        .json::<Value>();
    assert_eq!(failed["state"], "failed");
    assert_eq!(failed["definition"], definition);
    assert!(failed["reason"]
        .as_str()
        .unwrap()
        .contains("unknown diagram type"));
}
