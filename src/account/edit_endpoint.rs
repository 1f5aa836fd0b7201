//! Defines the endpoint for updating an account.

use axum::{
    Json,
    extract::{Path, State},
};
use rusqlite::{Connection, params};

use crate::{
    Error,
    account::{
        core::{Account, AccountId, get_account},
        create_endpoint::{AccountForm, AccountState},
    },
    app_state::lock_connection,
    json_body::JsonBody,
};

/// A route handler for replacing an account's details, responds with the updated account.
pub async fn edit_account_endpoint(
    State(state): State<AccountState>,
    Path(account_id): Path<AccountId>,
    JsonBody(form): JsonBody<AccountForm>,
) -> Result<Json<Account>, Error> {
    let form = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_account(account_id, &form, &connection)
        .inspect_err(|error| tracing::error!("Could not update account {account_id}: {error}"))
        .map(Json)
}

pub(super) fn update_account(
    id: AccountId,
    form: &AccountForm,
    connection: &Connection,
) -> Result<Account, Error> {
    let rows_affected = connection.execute(
        "UPDATE account
        SET name = ?1, description = ?2, balance = ?3, currency = ?4, active = ?5
        WHERE id = ?6",
        params![
            form.name,
            form.description,
            form.balance,
            form.currency,
            form.active,
            id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    get_account(id, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::create_endpoint::{AccountForm, create_account},
        db::initialize,
    };

    use super::update_account;

    fn form(name: &str, active: bool) -> AccountForm {
        AccountForm {
            name: name.to_owned(),
            description: None,
            balance: 10.0,
            currency: "GBP".to_owned(),
            active,
        }
    }

    #[test]
    fn updates_all_fields() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let account = create_account(&form("Old", true), &connection).unwrap();

        let updated = update_account(account.id, &form("New", false), &connection).unwrap();

        assert_eq!(updated.id, account.id);
        assert_eq!(updated.name, "New");
        assert!(!updated.active);
        assert_eq!(updated.created_at, account.created_at);
    }

    #[test]
    fn update_missing_account_fails() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let result = update_account(99, &form("Ghost", true), &connection);

        assert_eq!(result, Err(Error::UpdateMissingAccount));
    }
}
