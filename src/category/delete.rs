//! Category deletion endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    app_state::lock_connection,
    category::{CategoryId, create::CategoryEndpointState, db::delete_category},
};

/// Handle category deletion. Payments in the category become uncategorized.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryEndpointState>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(category_id, &connection) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(Error::DeleteMissingCategory) => Err(Error::DeleteMissingCategory),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            Err(error)
        }
    }
}
