//! Application router configuration.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_endpoint, get_accounts_endpoint,
    },
    budget::get_budget_endpoint,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    forecast::{get_dashboard_endpoint, get_forecast_endpoint},
    health::get_health_endpoint,
    logging::logging_middleware,
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_income_endpoint, create_payment_endpoint, delete_income_endpoint,
        delete_payment_endpoint, get_incomes_endpoint, get_payments_endpoint,
        update_income_endpoint, update_payment_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health_endpoint))
        .route(endpoints::BUDGET, get(get_budget_endpoint))
        .route(
            endpoints::INCOMES,
            get(get_incomes_endpoint).post(create_income_endpoint),
        )
        .route(
            endpoints::INCOME,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(
            endpoints::PAYMENTS,
            get(get_payments_endpoint).post(create_payment_endpoint),
        )
        .route(
            endpoints::PAYMENT,
            put(update_payment_endpoint).delete(delete_payment_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::ACCOUNTS,
            get(get_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::SETTINGS,
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route(endpoints::FORECAST, get(get_forecast_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("no route for {uri}");

    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("no route for {}", uri.path()) })),
    )
}
