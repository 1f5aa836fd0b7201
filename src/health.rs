//! The health check endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::AppState;

/// The state needed to check the database connection.
#[derive(Debug, Clone)]
pub struct HealthState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
}

/// The body of a health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" if the database answered, otherwise "degraded".
    pub status: &'static str,
    /// The current time as an RFC 3339 string.
    pub timestamp: String,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

fn database_is_connected(db_connection: &Mutex<Connection>) -> bool {
    let Ok(connection) = db_connection.lock() else {
        tracing::error!("health check could not acquire the database lock");
        return false;
    };

    connection
        .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .inspect_err(|error| tracing::error!("health check query failed: {error}"))
        .is_ok()
}

/// Report whether the server and its database are up.
///
/// Always responds with 200 OK so the body can say what is wrong.
pub async fn get_health_endpoint(State(state): State<HealthState>) -> Json<HealthResponse> {
    let connected = database_is_connected(&state.db_connection);
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(HealthResponse {
        status: if connected { "ok" } else { "degraded" },
        timestamp,
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth { connected },
    })
}
