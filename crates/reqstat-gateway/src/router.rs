//! Axum router wiring.
//!
//! Layer order matters: `stamp_origin` is added last so it runs first, and
//! `track_request` is a `Router::layer` so `MatchedPath` is already set.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, lifecycle, ops, services};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/v1/users/:id", get(services::users::get_user))
        .route("/v1/echo", post(services::echo::echo))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lifecycle::track_request,
        ))
        .layer(middleware::from_fn(lifecycle::stamp_origin))
        .with_state(state)
}
