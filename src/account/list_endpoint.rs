//! Defines the endpoints for reading accounts.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    account::{
        core::{Account, AccountId, get_account, get_all_accounts},
        create_endpoint::AccountState,
    },
    app_state::lock_connection,
};

/// A route handler for listing every account, active or not, ordered by name.
pub async fn get_accounts_endpoint(
    State(state): State<AccountState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Could not get accounts: {error}"))
        .map(Json)
}

/// A route handler for getting a single account.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_account(account_id, &connection).map(Json)
}
