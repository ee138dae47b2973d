// handlers/income/update.rs - PUT /api/income/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};

use crate::database::Income;
use crate::error::ApiError;
use crate::middleware::Caller;
use crate::state::AppState;

/// PUT /api/income/:id - partial update, owner only
///
/// Fields absent from the body keep their stored value. `owner` and `id`
/// in the body are ignored. The body is decoded after the ownership check,
/// so a missing or malformed body never hides NotFound / 401 answers.
pub async fn income_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Json<Income>, ApiError> {
    let income = state.incomes.update(&id, caller.user_id(), &body).await?;
    Ok(Json(income))
}
