//! Route handlers for payments.

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
        payment::{
            Payment, PaymentForm, PaymentId, create_payment, delete_payment, get_all_payments,
            update_payment,
        },
    },
};

/// List all payments, most recent first.
pub async fn get_payments_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<Payment>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_payments(&connection)
        .inspect_err(|error| tracing::error!("Could not get payments: {error}"))
        .map(Json)
}

/// Create a payment, responds with 201 Created and the new payment.
pub async fn create_payment_endpoint(
    State(state): State<TransactionState>,
    JsonBody(form): JsonBody<PaymentForm>,
) -> Result<(StatusCode, Json<Payment>), Error> {
    let payment = form.validate(&state.holidays)?;
    let connection = lock_connection(&state.db_connection)?;

    let payment = create_payment(&payment, &connection)?;
    tracing::info!("created payment {} \"{}\"", payment.id, payment.description);

    Ok((StatusCode::CREATED, Json(payment)))
}

/// Replace a payment, responds with the updated payment.
pub async fn update_payment_endpoint(
    State(state): State<TransactionState>,
    Path(payment_id): Path<PaymentId>,
    JsonBody(form): JsonBody<PaymentForm>,
) -> Result<Json<Payment>, Error> {
    let payment = form.validate(&state.holidays)?;
    let connection = lock_connection(&state.db_connection)?;

    update_payment(payment_id, &payment, &connection).map(Json)
}

/// Delete a payment, responds with 204 No Content.
pub async fn delete_payment_endpoint(
    State(state): State<TransactionState>,
    Path(payment_id): Path<PaymentId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_payment(payment_id, &connection)?;
    tracing::info!("deleted payment {payment_id}");

    Ok(StatusCode::NO_CONTENT)
}
