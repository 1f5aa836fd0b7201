//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::core::{Account, get_account},
    app_state::lock_connection,
    json_body::JsonBody,
};

/// The state needed to get, create, update or delete an account.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_owned()
}

fn default_active() -> bool {
    true
}

/// The request body for creating or updating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// Free text notes about the account.
    #[serde(default)]
    pub description: Option<String>,
    /// The reference balance.
    #[serde(default)]
    pub balance: f64,
    /// The currency code, defaults to "USD".
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Whether the account shows up in the budget snapshot.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl AccountForm {
    /// Trim the text fields and check the name is not empty.
    pub(super) fn validate(mut self) -> Result<Self, Error> {
        self.name = self.name.trim().to_owned();

        if self.name.is_empty() {
            return Err(Error::EmptyName);
        }

        self.description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        let currency = self.currency.trim();
        self.currency = if currency.is_empty() {
            default_currency()
        } else {
            currency.to_owned()
        };

        Ok(self)
    }
}

/// A route handler for creating a new account, responds with the created account.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    JsonBody(form): JsonBody<AccountForm>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let form = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(&form, &connection).inspect_err(|error| {
        tracing::error!("Could not create account with {form:?}: {error}")
    })?;

    tracing::info!("created account {} \"{}\"", account.id, account.name);

    Ok((StatusCode::CREATED, Json(account)))
}

pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    connection.execute(
        "INSERT INTO account (name, description, balance, currency, active)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            form.name,
            form.description,
            form.balance,
            form.currency,
            form.active
        ],
    )?;

    let id = connection.last_insert_rowid();

    get_account(id, connection)
}
