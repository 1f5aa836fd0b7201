//! The combined read model of all budget data.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    account::{Account, get_active_accounts},
    app_state::lock_connection,
    category::{Category, get_all_categories},
    settings::{Settings, get_settings},
    transaction::{Income, Payment, get_all_incomes, get_all_payments},
};

/// Everything a client needs to render the budget, read in one go.
///
/// Only active accounts are included. Income and payments keep their account
/// references even when the account is inactive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub settings: Settings,
    pub incomes: Vec<Income>,
    pub payments: Vec<Payment>,
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
}

impl BudgetSnapshot {
    /// Read the snapshot from the database.
    ///
    /// Transactions with unreadable dates are left out.
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            settings: get_settings(connection)?,
            incomes: get_all_incomes(connection)?,
            payments: get_all_payments(connection)?,
            categories: get_all_categories(connection)?,
            accounts: get_active_accounts(connection)?,
        })
    }

    /// The date of the earliest income or payment, if there are any.
    pub fn earliest_transaction_date(&self) -> Option<time::Date> {
        self.incomes
            .iter()
            .map(|income| income.date)
            .chain(self.payments.iter().map(|payment| payment.date))
            .min()
    }
}

/// The state needed to read the budget snapshot.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the full budget snapshot.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
) -> Result<Json<BudgetSnapshot>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    BudgetSnapshot::load(&connection)
        .inspect_err(|error| tracing::error!("Could not load the budget snapshot: {error}"))
        .map(Json)
}
