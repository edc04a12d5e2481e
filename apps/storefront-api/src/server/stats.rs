//! System statistics endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::{ApiResult, AppState};
use crate::db::stats;

/// `GET /stats`
pub async fn system_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    let stats = stats::gather(&mut conn).await?;
    Ok(Json(json!({ "system_stats": stats })))
}
