//! Route handlers for the cash-flow forecast and the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::Query;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    account::AccountId,
    app_state::lock_connection,
    budget::BudgetSnapshot,
    forecast::{
        DashboardWindow, Granularity, Period, ProjectionInput, ScheduledTransaction,
        filter_by_accounts, project, resolve_window,
        summary::{CategoryExpense, ProjectionSummary, expenses_by_category},
    },
    timezone::local_today,
};

/// The most periods a single forecast request may ask for.
pub const MAX_FORECAST_PERIODS: i64 = 1000;

/// The number of periods forecast when the request does not say.
const DEFAULT_FORECAST_PERIODS: i64 = 12;

/// The state needed to compute forecasts and dashboards.
#[derive(Debug, Clone)]
pub struct ForecastState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Used to work out today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ForecastState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for `GET /api/forecast`.
///
/// Accounts are given as repeated keys, e.g. `?accounts=1&accounts=2`.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    #[serde(default)]
    pub granularity: Granularity,
    pub periods: Option<i64>,
    pub anchor: Option<Date>,
    #[serde(default)]
    pub accounts: Vec<AccountId>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub granularity: Granularity,
    pub anchor_date: Date,
    pub periods: Vec<Period>,
    pub summary: ProjectionSummary,
}

/// The query string for `GET /api/dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub window: DashboardWindow,
    #[serde(default)]
    pub accounts: Vec<AccountId>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub window: DashboardWindow,
    pub label: &'static str,
    pub periods: Vec<Period>,
    pub summary: ProjectionSummary,
    pub expenses_by_category: Vec<CategoryExpense>,
}

/// Build the projector input from a snapshot, keeping only transactions that
/// match the account filter.
fn projection_input(
    snapshot: &BudgetSnapshot,
    accounts: &[AccountId],
    granularity: Granularity,
    period_count: i64,
    anchor_date: Date,
) -> ProjectionInput {
    let incomes = snapshot.incomes.iter().map(ScheduledTransaction::from).collect();
    let payments = snapshot.payments.iter().map(ScheduledTransaction::from).collect();

    ProjectionInput {
        incomes: filter_by_accounts(incomes, accounts),
        payments: filter_by_accounts(payments, accounts),
        start_balance: snapshot.settings.start_balance,
        granularity,
        period_count,
        anchor_date,
    }
}

fn load_snapshot(db_connection: &Mutex<Connection>) -> Result<BudgetSnapshot, Error> {
    let connection = lock_connection(db_connection)?;

    BudgetSnapshot::load(&connection)
        .inspect_err(|error| tracing::error!("Could not load transactions for projection: {error}"))
}

/// Project the budget forward from `anchor` (default today).
pub async fn get_forecast_endpoint(
    State(state): State<ForecastState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, Error> {
    let period_count = query.periods.unwrap_or(DEFAULT_FORECAST_PERIODS);

    if period_count > MAX_FORECAST_PERIODS {
        return Err(Error::InvalidPeriodCount(period_count));
    }

    let anchor_date = match query.anchor {
        Some(anchor) => anchor,
        None => local_today(&state.local_timezone)?,
    };

    let snapshot = load_snapshot(&state.db_connection)?;
    let input = projection_input(
        &snapshot,
        &query.accounts,
        query.granularity,
        period_count,
        anchor_date,
    );
    let periods = project(&input);
    let summary = ProjectionSummary::new(input.start_balance, &periods);

    tracing::debug!(
        "forecast of {} {:?} periods from {anchor_date}",
        periods.len(),
        query.granularity
    );

    Ok(Json(ForecastResponse {
        granularity: query.granularity,
        anchor_date,
        periods,
        summary,
    }))
}

/// Monthly totals over a dashboard window ending with the current month.
pub async fn get_dashboard_endpoint(
    State(state): State<ForecastState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, Error> {
    let today = local_today(&state.local_timezone)?;
    let snapshot = load_snapshot(&state.db_connection)?;

    let window = resolve_window(query.window, today, snapshot.earliest_transaction_date());
    let input = projection_input(
        &snapshot,
        &query.accounts,
        Granularity::Monthly,
        window.period_count,
        window.anchor_date,
    );
    let periods = project(&input);
    let summary = ProjectionSummary::new(input.start_balance, &periods);
    let expenses_by_category = expenses_by_category(&periods, &snapshot.payments);

    Ok(Json(DashboardResponse {
        window: query.window,
        label: query.window.label(),
        periods,
        summary,
        expenses_by_category,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{db::initialize, endpoints};

    use super::{ForecastState, get_dashboard_endpoint, get_forecast_endpoint};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute_batch(
                "UPDATE settings SET start_balance = 1000 WHERE id = 1;
                INSERT INTO account (id, name) VALUES (1, 'Everyday'), (2, 'Savings');
                INSERT INTO income (description, amount, date) VALUES ('Gift', 500, '2024-01-15');
                INSERT INTO payment (description, amount, date, recurring, frequency)
                    VALUES ('Rent', 200, '2024-01-01', 1, 'monthly');
                INSERT INTO payment (description, amount, date, account_id)
                    VALUES ('Car repair', 300, '2024-02-10', 2);",
            )
            .unwrap();

        let state = ForecastState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let app = Router::new()
            .route(endpoints::FORECAST, get(get_forecast_endpoint))
            .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn balances(body: &Value) -> Vec<f64> {
        body["periods"]
            .as_array()
            .unwrap()
            .iter()
            .map(|period| period["running_balance"].as_f64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn forecast_from_anchor() {
        let server = get_test_server();

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("granularity", "monthly")
            .add_query_param("periods", 3)
            .add_query_param("anchor", "2024-01-01")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(balances(&body), vec![1300.0, 800.0, 600.0]);
        assert_eq!(body["periods"][0]["label"], "Jan 2024");
        assert_eq!(body["summary"]["end_balance"], 600.0);
    }

    #[tokio::test]
    async fn forecast_filters_by_account() {
        let server = get_test_server();

        let response = server
            .get(&format!(
                "{}?periods=3&anchor=2024-01-01&accounts=1",
                endpoints::FORECAST
            ))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        // The car repair belongs to account 2 and is left out.
        assert_eq!(balances(&body), vec![1300.0, 1100.0, 900.0]);
    }

    #[tokio::test]
    async fn forecast_rejects_too_many_periods() {
        let server = get_test_server();

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("periods", 1001)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn forecast_with_zero_periods_is_empty() {
        let server = get_test_server();

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("periods", 0)
            .add_query_param("anchor", "2024-01-01")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["periods"].as_array().unwrap().is_empty());
        assert_eq!(body["summary"]["end_balance"], 1000.0);
    }

    #[tokio::test]
    async fn dashboard_all_window_starts_at_earliest_transaction() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD)
            .add_query_param("window", "all")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["window"], "all");
        assert_eq!(body["periods"][0]["period_start"], "2024-01-01");
        assert_eq!(body["periods"][0]["income"], 500.0);
        let categories = body["expenses_by_category"].as_array().unwrap();
        assert_eq!(categories.last().unwrap()["category"], "Uncategorized");
    }

    #[tokio::test]
    async fn dashboard_defaults_to_twelve_months() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["window"], "1y");
        assert_eq!(body["periods"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn dashboard_rejects_unknown_window() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD)
            .add_query_param("window", "2w")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
