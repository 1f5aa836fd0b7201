use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, transaction::HolidayCalendar};

/// The state needed to create, update or delete income and payments.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The holidays used when a date adjustment is requested.
    pub holidays: Arc<HolidayCalendar>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            holidays: state.holidays.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn get_test_transaction_state() -> TransactionState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    crate::db::initialize(&connection).expect("Could not initialize database");

    TransactionState {
        db_connection: Arc::new(Mutex::new(connection)),
        holidays: Arc::new(HolidayCalendar::uk_bank_holidays()),
    }
}
