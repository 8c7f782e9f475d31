#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceExt;

use reqstat_core::sink::MemorySink;
use reqstat_gateway::{app_state::AppState, config, lifecycle, router};

fn app(yaml: &str) -> (axum::Router, Arc<MemorySink>) {
    let cfg = config::load_from_str(yaml).unwrap();
    let sink = Arc::new(MemorySink::new());
    let state = AppState::with_sink(cfg, sink.clone()).unwrap();
    (router::build_router(state), sink)
}

const ENABLED: &str = r#"
version: 1
statsd:
  enable: true
  memory_pattern: "app.%controller%.%http-method%.%http-code%.memory"
  timer_pattern: "app.%controller%.%http-method%.%http-code%.%response-content-type%.time"
"#;

#[tokio::test]
async fn one_batch_per_request_with_rendered_names() {
    let (app, sink) = app(ENABLED);

    let res = app
        .oneshot(Request::get("/v1/users/7").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    let lines = &batches[0];
    assert_eq!(lines.len(), 2);

    assert!(
        lines[0].starts_with("app._v1_users_id.GET.200.memory:"),
        "{lines:?}"
    );
    assert!(
        lines[1].starts_with("app._v1_users_id.GET.200.application_json.time:"),
        "{lines:?}"
    );
    assert!(lines.iter().all(|l| l.ends_with("|ms")), "{lines:?}");
}

#[tokio::test]
async fn status_and_method_flow_into_names() {
    let (app, sink) = app(ENABLED);

    let res = app
        .clone()
        .oneshot(Request::get("/v1/users/0").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .oneshot(
            Request::post("/v1/echo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"hello":"world"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert!(batches[0][0].starts_with("app._v1_users_id.GET.404.memory:"));
    assert!(batches[1][0].starts_with("app._v1_echo.POST.200.memory:"));
}

#[tokio::test]
async fn event_metrics_include_handler_events() {
    let yaml = r#"
version: 1
statsd:
  enable: true
  memory_pattern: "m"
  timer_pattern: "t"
  event_metrics: true
"#;
    let (app, sink) = app(yaml);

    app.oneshot(Request::get("/v1/users/1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    let names: Vec<&str> = batches[0]
        .iter()
        .map(|l| l.split(':').next().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "m",
            "t",
            "t.bootstrap",
            "m.bootstrap",
            "t.dispatch",
            "m.dispatch",
            "t.render",
            "m.render",
        ]
    );
}

#[tokio::test]
async fn disabled_emits_nothing() {
    let (app, sink) = app("version: 1\n");

    let res = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(sink.calls(), 0);
}

#[tokio::test]
async fn missing_origin_passes_request_through_untracked() {
    let cfg = config::load_from_str(ENABLED).unwrap();
    let sink = Arc::new(MemorySink::new());
    let state = AppState::with_sink(cfg, sink.clone()).unwrap();

    // Tracking without the origin stamp in front of it.
    let app = Router::new()
        .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lifecycle::track_request,
        ))
        .with_state(state);

    let res = app
        .oneshot(Request::get("/teapot").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(sink.calls(), 0);
}
