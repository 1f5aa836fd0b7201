//! Category listing endpoint.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::lock_connection,
    category::{Category, create::CategoryEndpointState, get_all_categories},
};

/// List every category, enabled or not, ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoryEndpointState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Could not get categories: {error}"))
        .map(Json)
}
