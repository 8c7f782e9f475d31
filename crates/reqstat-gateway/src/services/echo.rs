use axum::Json;
use serde_json::Value;

/// `POST /v1/echo`: returns the JSON body unchanged.
pub async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}
