//! Router-level tests through the assembled axum app.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use wraithdriver::config::DriverConfig;
use wraithdriver::lifecycle::Shutdown;
use wraithdriver::protocol::Dispatcher;
use wraithdriver::session::SessionRegistry;
use wraithdriver::HttpServer;

fn app() -> axum::Router {
    let engine = Arc::new(SessionRegistry::new());
    let shutdown = Arc::new(Shutdown::new());
    let dispatcher = Arc::new(Dispatcher::with_default_handlers(engine, shutdown.clone()));
    HttpServer::new(&DriverConfig::default(), dispatcher, shutdown).router()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn status_over_http() {
    let resp = app()
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );
    let body = body_json(resp).await;
    assert_eq!(body["value"]["ready"], true);
}

#[tokio::test]
async fn shutdown_over_http_has_exact_html_response() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/session/abc/shutdown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html;charset=UTF-8"
    );
    assert_eq!(resp.headers().get(header::CONTENT_LENGTH).unwrap(), "36");

    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"<html><body>Closing...</body></html>");
}

#[tokio::test]
async fn create_session_over_http() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"capabilities": {}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["value"]["sessionId"].is_string());
}

#[tokio::test]
async fn unknown_path_is_404_with_error_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/definitely/not/a/command")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["value"]["error"], "unknown command");
}

#[tokio::test]
async fn wrong_method_is_405_over_http() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shutdown")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(resp).await;
    assert_eq!(body["value"]["error"], "unknown method");
}

#[tokio::test]
async fn root_path_is_handled_not_hung() {
    let resp = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
