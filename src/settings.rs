//! The application settings, stored as a single row that always exists.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, app_state::lock_connection, json_body::JsonBody};

/// User preferences and the balance forecasts start from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// The currency code used for display, e.g. "USD".
    pub currency: String,
    /// The balance the forecast and dashboard start from.
    pub start_balance: f64,
    /// How clients should display dates, e.g. "MM/DD/YYYY".
    pub date_format: String,
    pub enable_notifications: bool,
    pub show_balance_in_header: bool,
}

/// The request body for updating the settings.
///
/// Only the currency is required. Missing toggles are off and a missing date
/// format falls back to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub start_balance: f64,
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub enable_notifications: bool,
    #[serde(default)]
    pub show_balance_in_header: bool,
}

impl SettingsForm {
    /// Trim the text fields and check the currency and start balance.
    ///
    /// # Errors
    /// Returns [Error::EmptyCurrency] if the currency is blank and
    /// [Error::InvalidAmount] if the start balance is not a finite number.
    pub fn validate(self) -> Result<Settings, Error> {
        let currency = self.currency.trim();

        if currency.is_empty() {
            return Err(Error::EmptyCurrency);
        }

        if !self.start_balance.is_finite() {
            return Err(Error::InvalidAmount(self.start_balance));
        }

        let date_format = match self.date_format.trim() {
            "" => Settings::default().date_format,
            date_format => date_format.to_owned(),
        };

        Ok(Settings {
            currency: currency.to_owned(),
            start_balance: self.start_balance,
            date_format,
            enable_notifications: self.enable_notifications,
            show_balance_in_header: self.show_balance_in_header,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".to_owned(),
            start_balance: 0.0,
            date_format: "MM/DD/YYYY".to_owned(),
            enable_notifications: false,
            show_balance_in_header: false,
        }
    }
}

/// The state needed to read and update the settings.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the settings table and insert the default settings row if it is missing.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            currency TEXT NOT NULL DEFAULT 'USD',
            start_balance REAL NOT NULL DEFAULT 0,
            date_format TEXT NOT NULL DEFAULT 'MM/DD/YYYY',
            enable_notifications INTEGER NOT NULL DEFAULT 0,
            show_balance_in_header INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Insert the settings row with default values unless it already exists.
pub fn ensure_settings_row(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute("INSERT OR IGNORE INTO settings (id) VALUES (1)", ())?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Settings, rusqlite::Error> {
    Ok(Settings {
        currency: row.get(0)?,
        start_balance: row.get(1)?,
        date_format: row.get(2)?,
        enable_notifications: row.get(3)?,
        show_balance_in_header: row.get(4)?,
    })
}

/// Get the settings.
pub fn get_settings(connection: &Connection) -> Result<Settings, Error> {
    connection
        .query_row(
            "SELECT currency, start_balance, date_format, enable_notifications,
                show_balance_in_header
            FROM settings WHERE id = 1",
            [],
            map_row,
        )
        .map_err(Error::from)
}

/// Overwrite the settings with a validated form.
pub fn update_settings(form: SettingsForm, connection: &Connection) -> Result<Settings, Error> {
    let settings = form.validate()?;

    connection.execute(
        "UPDATE settings SET currency = ?1, start_balance = ?2, date_format = ?3,
            enable_notifications = ?4, show_balance_in_header = ?5
        WHERE id = 1",
        (
            &settings.currency,
            settings.start_balance,
            &settings.date_format,
            settings.enable_notifications,
            settings.show_balance_in_header,
        ),
    )?;

    Ok(settings)
}

/// Respond with the current settings.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
) -> Result<Json<Settings>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_settings(&connection).map(Json)
}

/// Replace the settings, responds with the saved settings.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    JsonBody(form): JsonBody<SettingsForm>,
) -> Result<Json<Settings>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let settings = update_settings(form, &connection)?;
    tracing::info!("updated settings");

    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{Error, db::initialize, endpoints};

    use super::{
        Settings, SettingsForm, SettingsState, get_settings, get_settings_endpoint,
        update_settings, update_settings_endpoint,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn defaults_exist_after_initialization() {
        let connection = get_test_connection();

        assert_eq!(get_settings(&connection), Ok(Settings::default()));
    }

    #[test]
    fn update_persists() {
        let connection = get_test_connection();
        let form = SettingsForm {
            currency: " NZD ".to_owned(),
            start_balance: 1234.5,
            ..Default::default()
        };

        let saved = update_settings(form, &connection).unwrap();

        assert_eq!(saved.currency, "NZD");
        assert_eq!(saved.date_format, "MM/DD/YYYY");
        assert_eq!(get_settings(&connection), Ok(saved));
    }

    #[test]
    fn update_requires_currency() {
        let connection = get_test_connection();
        let form = SettingsForm {
            currency: "".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            update_settings(form, &connection),
            Err(Error::EmptyCurrency)
        );
    }

    #[test]
    fn second_settings_row_is_rejected() {
        let connection = get_test_connection();

        let result = connection.execute("INSERT INTO settings (id) VALUES (2)", []);

        assert!(result.is_err());
    }

    fn get_test_server() -> TestServer {
        let state = SettingsState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let app = Router::new()
            .route(
                endpoints::SETTINGS,
                get(get_settings_endpoint).put(update_settings_endpoint),
            )
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_and_put_settings() {
        let server = get_test_server();

        server
            .put(endpoints::SETTINGS)
            .json(&json!({
                "currency": "GBP",
                "start_balance": 250.0,
                "date_format": "DD/MM/YYYY",
                "enable_notifications": true,
                "show_balance_in_header": false
            }))
            .await
            .assert_status_ok();

        let settings: Value = server.get(endpoints::SETTINGS).await.json();
        assert_eq!(settings["currency"], "GBP");
        assert_eq!(settings["start_balance"], 250.0);
        assert_eq!(settings["enable_notifications"], true);
    }

    #[tokio::test]
    async fn put_with_only_currency_and_balance_uses_defaults() {
        let server = get_test_server();

        let response = server
            .put(endpoints::SETTINGS)
            .json(&json!({ "currency": "EUR", "start_balance": 5 }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "currency": "EUR",
            "start_balance": 5.0,
            "date_format": "MM/DD/YYYY",
            "enable_notifications": false,
            "show_balance_in_header": false
        }));
    }

    #[tokio::test]
    async fn put_without_currency_is_bad_request() {
        let server = get_test_server();

        let response = server
            .put(endpoints::SETTINGS)
            .json(&json!({ "start_balance": 10 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "currency is required" }));
    }

    #[tokio::test]
    async fn put_with_blank_currency_is_bad_request() {
        get_test_server()
            .put(endpoints::SETTINGS)
            .json(&json!({ "currency": " " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
