use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde::Serialize;

use crate::lifecycle::LifecycleHandle;

/// Handler-level event around building the response body.
pub const RENDER: &str = "render";

#[derive(Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// `GET /v1/users/:id`. Id `0` is never assigned.
pub async fn get_user(
    Path(id): Path<u64>,
    lifecycle: Option<Extension<LifecycleHandle>>,
) -> Result<Json<User>, StatusCode> {
    let _render = lifecycle.as_ref().map(|Extension(h)| h.span(RENDER));

    if id == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(User {
        id,
        name: format!("user-{id}"),
    }))
}
