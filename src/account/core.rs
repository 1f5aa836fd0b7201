use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, database_id::DatabaseId};

pub type AccountId = DatabaseId;

/// A bank account, credit card or cash pot that transactions can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// Free text notes about the account.
    pub description: Option<String>,
    /// A reference balance entered by the user, not derived from transactions.
    pub balance: f64,
    /// The currency code of the account, e.g. "USD".
    pub currency: String,
    /// Inactive accounts are hidden from the budget snapshot and filters.
    pub active: bool,
    /// When the account was created, as stored by SQLite.
    pub created_at: String,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            balance REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'USD',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        (),
    )?;

    Ok(())
}

pub(super) const SELECT_ACCOUNT: &str =
    "SELECT id, name, description, balance, currency, active, created_at FROM account";

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let description = row.get(2)?;
    let balance = row.get(3)?;
    let currency = row.get(4)?;
    let active = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Account {
        id,
        name,
        description,
        balance,
        currency,
        active,
        created_at,
    })
}

/// Get a single account by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no account with `id`.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            &format!("{SELECT_ACCOUNT} WHERE id = ?1"),
            [id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get all accounts ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!("{SELECT_ACCOUNT} ORDER BY name ASC, id ASC"))?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Get the accounts that are marked as active, ordered by name.
pub fn get_active_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE active = 1 ORDER BY name ASC, id ASC"
        ))?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}
