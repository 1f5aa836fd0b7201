//! Defines the endpoint for deleting an account.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    Error,
    account::{core::AccountId, create_endpoint::AccountState},
    app_state::lock_connection,
};

/// A route handler for deleting an account, responds with 204 No Content.
///
/// Income and payments assigned to the account are kept and become unassigned.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    Path(account_id): Path<AccountId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("Could not delete account {account_id}: {error}"))?;

    tracing::info!("deleted account {account_id}");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an account and clear the references to it in one SQL transaction.
pub(super) fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "UPDATE income SET account_id = NULL WHERE account_id = ?1",
        [id],
    )?;
    transaction.execute(
        "UPDATE payment SET account_id = NULL WHERE account_id = ?1",
        [id],
    )?;
    let rows_affected = transaction.execute("DELETE FROM account WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        // Dropping the transaction rolls back the updates above.
        return Err(Error::DeleteMissingAccount);
    }

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{
            core::get_account,
            create_endpoint::{AccountForm, create_account},
        },
        db::initialize,
    };

    use super::delete_account;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn deletes_account_and_keeps_transactions() {
        let connection = get_test_connection();
        let account = create_account(
            &AccountForm {
                name: "foo".to_owned(),
                description: None,
                balance: 420.69,
                currency: "USD".to_owned(),
                active: true,
            },
            &connection,
        )
        .unwrap();
        connection
            .execute(
                "INSERT INTO income (id, description, amount, date, account_id)
                VALUES (1, 'Pay', 10, '2024-01-01', ?1)",
                [account.id],
            )
            .unwrap();
        connection
            .execute(
                "INSERT INTO payment (id, description, amount, date, account_id)
                VALUES (1, 'Rent', 5, '2024-01-01', ?1)",
                [account.id],
            )
            .unwrap();

        delete_account(account.id, &connection).unwrap();

        assert_eq!(get_account(account.id, &connection), Err(Error::NotFound));
        let income_account: Option<i64> = connection
            .query_row("SELECT account_id FROM income WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        let payment_account: Option<i64> = connection
            .query_row("SELECT account_id FROM payment WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(income_account, None);
        assert_eq!(payment_account, None);
    }

    #[test]
    fn delete_missing_account_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_account(1, &connection),
            Err(Error::DeleteMissingAccount)
        );
    }
}
