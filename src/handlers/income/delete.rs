// handlers/income/delete.rs - DELETE /api/income/:id handler

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::Caller;
use crate::state::AppState;

/// DELETE /api/income/:id - permanent removal, owner only. Responds with `{ "id": ... }`.
pub async fn income_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Value>, ApiError> {
    let id = state.incomes.delete(&id, caller.user_id()).await?;
    Ok(Json(json!({ "id": id })))
}
