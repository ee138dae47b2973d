// handlers/income/create.rs - POST /api/income handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::database::{Income, NewIncome};
use crate::error::ApiError;
use crate::middleware::Caller;
use crate::state::AppState;

/// POST /api/income - create a record owned by the caller
///
/// Expected Input:
/// ```json
/// {
///   "income_title": "Salary",      // title or amount required
///   "income_amount": 1200,
///   "income_date": "2024-01-31",   // optional
///   "income_receipt": "r-001",     // optional
///   "category_id": "salary"        // optional
/// }
/// ```
pub async fn income_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<NewIncome>, JsonRejection>,
) -> Result<Json<Income>, ApiError> {
    let Json(fields) = payload?;
    let income = state.incomes.create(caller.user_id(), fields).await?;
    Ok(Json(income))
}
