use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};

use reqstat_core::context::{HttpExchange, HttpRequestParts, HttpResponseParts};

use crate::app_state::AppState;
use crate::lifecycle::LifecycleHandle;

/// Event wrapping the routed handler.
pub const DISPATCH: &str = "dispatch";

/// When the request entered the gateway.
#[derive(Debug, Clone, Copy)]
pub struct RequestOrigin(pub Instant);

/// Outermost layer: stamps the request origin before anything else runs.
pub async fn stamp_origin(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(RequestOrigin(Instant::now()));
    next.run(req).await
}

fn content_type(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| vec![(CONTENT_TYPE.as_str().to_string(), v.to_string())])
        .unwrap_or_default()
}

/// Per-request collector: times `dispatch`, then emits on the way out.
///
/// Nothing here can change the response. A missing origin is logged and the
/// request goes through untracked.
pub async fn track_request(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    if !app.statsd_enabled() {
        return next.run(req).await;
    }

    let origin = req.extensions().get::<RequestOrigin>().map(|o| o.0);
    let collector = match app.collector(origin) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, class = e.class().as_str(), "request metrics unavailable");
            return next.run(req).await;
        }
    };

    let handle = LifecycleHandle::new(collector);
    let controller = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string());
    let request = HttpRequestParts {
        method: req.method().as_str().to_string(),
        headers: content_type(req.headers()),
    };
    req.extensions_mut().insert(handle.clone());

    handle.start(DISPATCH);
    let response = next.run(req).await;
    handle.end(DISPATCH);

    let exchange = HttpExchange {
        controller,
        request: Some(request),
        response: Some(HttpResponseParts {
            status: response.status().as_u16(),
            headers: content_type(response.headers()),
        }),
    };
    if let Some(lines) = handle.finish(&exchange) {
        tracing::trace!(lines, "request metrics flushed");
    }

    response
}
