//! The API endpoints URIs.
//!
//! Paths with a parameter, e.g. '/api/income/{income_id}', use axum's `{name}` capture syntax.

/// The route for checking that the server and database are up.
pub const HEALTH: &str = "/api/health";
/// The route for the combined snapshot of all budget data.
pub const BUDGET: &str = "/api/budget";
/// The route to list and create income records.
pub const INCOMES: &str = "/api/income";
/// The route to update or delete a single income record.
pub const INCOME: &str = "/api/income/{income_id}";
/// The route to list and create payments.
pub const PAYMENTS: &str = "/api/payment";
/// The route to update or delete a single payment.
pub const PAYMENT: &str = "/api/payment/{payment_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to get, update or delete a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route for the settings singleton.
pub const SETTINGS: &str = "/api/settings";
/// The route for the cash-flow forecast.
pub const FORECAST: &str = "/api/forecast";
/// The route for the dashboard aggregates.
pub const DASHBOARD: &str = "/api/dashboard";

/// Replace the `{..}` parameter in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}
