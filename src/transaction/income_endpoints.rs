//! Route handlers for income records.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    app_state::lock_connection,
    json_body::JsonBody,
    transaction::{
        endpoint_state::TransactionState,
        income::{
            Income, IncomeForm, IncomeId, create_income, delete_income, get_all_incomes,
            update_income,
        },
    },
};

/// List all income records, most recent first.
pub async fn get_incomes_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<Income>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_incomes(&connection)
        .inspect_err(|error| tracing::error!("Could not get income records: {error}"))
        .map(Json)
}

/// Create an income record, responds with 201 Created and the new record.
pub async fn create_income_endpoint(
    State(state): State<TransactionState>,
    JsonBody(form): JsonBody<IncomeForm>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let income = form.validate(&state.holidays)?;
    let connection = lock_connection(&state.db_connection)?;

    let income = create_income(&income, &connection)?;
    tracing::info!("created income {} \"{}\"", income.id, income.description);

    Ok((StatusCode::CREATED, Json(income)))
}

/// Replace an income record, responds with the updated record.
pub async fn update_income_endpoint(
    State(state): State<TransactionState>,
    Path(income_id): Path<IncomeId>,
    JsonBody(form): JsonBody<IncomeForm>,
) -> Result<Json<Income>, Error> {
    let income = form.validate(&state.holidays)?;
    let connection = lock_connection(&state.db_connection)?;

    update_income(income_id, &income, &connection).map(Json)
}

/// Delete an income record, responds with 204 No Content.
pub async fn delete_income_endpoint(
    State(state): State<TransactionState>,
    Path(income_id): Path<IncomeId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_income(income_id, &connection)?;
    tracing::info!("deleted income {income_id}");

    Ok(StatusCode::NO_CONTENT)
}
