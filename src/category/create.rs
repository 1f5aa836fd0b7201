//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    category::{Category, CategoryForm, CategoryName, create_category},
    json_body::JsonBody,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category creation. Responds with the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    JsonBody(form): JsonBody<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, form.color.trim(), form.enabled, &connection)
        .inspect_err(|error| {
            tracing::error!("An unexpected error occurred while creating a category: {error}")
        })?;

    Ok((StatusCode::CREATED, Json(category)))
}
