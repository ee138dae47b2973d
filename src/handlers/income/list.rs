// handlers/income/list.rs - GET /api/income handler

use axum::{extract::State, Json};

use crate::database::Income;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/income - every income record, not filtered by caller
pub async fn income_list(State(state): State<AppState>) -> Result<Json<Vec<Income>>, ApiError> {
    let incomes = state.incomes.list().await?;
    Ok(Json(incomes))
}
