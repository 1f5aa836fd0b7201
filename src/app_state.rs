//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{Error, db::initialize, transaction::HolidayCalendar};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The holidays that transaction dates may be moved off when they are entered.
    pub holidays: Arc<HolidayCalendar>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        holidays: HolidayCalendar,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            holidays: Arc::new(holidays),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

/// Lock the shared database connection, logging and mapping a poisoned lock.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, transaction::HolidayCalendar};

    use super::AppState;

    #[test]
    fn new_initializes_the_database() {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "Etc/UTC",
            HolidayCalendar::default(),
        )
        .unwrap();

        let connection = state.db_connection.lock().unwrap();
        let settings_rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(settings_rows, 1);
    }

    #[test]
    fn poisoned_lock_is_a_lock_error() {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "Etc/UTC",
            HolidayCalendar::default(),
        )
        .unwrap();
        let connection = state.db_connection.clone();

        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            super::lock_connection(&state.db_connection),
            Err(Error::DatabaseLockError)
        ));
    }
}
