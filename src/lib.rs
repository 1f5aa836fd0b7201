//! Budget Forecast is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and payment
//! transactions, organising them by category and account, and projecting
//! recurring transactions forward into dashboard summaries and cash-flow
//! forecasts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use time::Date;
use tokio::signal;

mod account;
mod app_state;
mod budget;
mod category;
mod database_id;
mod db;
mod endpoints;
mod forecast;
mod health;
mod json_body;
mod logging;
mod routing;
mod settings;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use forecast::{
    DashboardWindow, Granularity, Occurrence, Period, ProjectionInput, ProjectionWindow,
    ScheduledTransaction, filter_by_accounts, project, resolve_window,
};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{
    AdjustmentDirection, DateAdjustment, Frequency, HolidayCalendar, adjust_date,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty or whitespace-only description was used for a transaction.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An empty or whitespace-only name was used for a category or account.
    #[error("name cannot be empty")]
    EmptyName,

    /// The settings were saved without a currency.
    #[error("currency is required")]
    EmptyCurrency,

    /// A transaction amount was zero, negative, NaN or infinite.
    #[error("{0} is not a valid amount, amounts must be positive numbers")]
    InvalidAmount(f64),

    /// A recurring payment was given an end date before its first occurrence.
    #[error("the end date {end_date} is before the start date {date}")]
    EndDateBeforeStartDate {
        /// The date of the first occurrence.
        date: Date,
        /// The requested end date.
        end_date: Date,
    },

    /// A forecast was requested with more periods than the server will compute.
    #[error(
        "{0} periods requested, at most {max} are allowed",
        max = forecast::MAX_FORECAST_PERIODS
    )]
    InvalidPeriodCount(i64),

    /// The request body was not valid JSON or did not match the expected shape.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A category or account ID did not refer to an existing row.
    #[error("the category or account ID does not refer to an existing record")]
    InvalidForeignKey,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The holiday calendar file could not be read or contained an invalid date.
    #[error("could not load the holiday calendar: {0}")]
    InvalidHolidayCalendar(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an income record that does not exist
    #[error("tried to update an income record that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an income record that does not exist
    #[error("tried to delete an income record that is not in the database")]
    DeleteMissingIncome,

    /// Tried to update a payment that does not exist
    #[error("tried to update a payment that is not in the database")]
    UpdateMissingPayment,

    /// Tried to delete a payment that does not exist
    #[error("tried to delete a payment that is not in the database")]
    DeleteMissingPayment,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyDescription
            | Error::EmptyName
            | Error::EmptyCurrency
            | Error::InvalidAmount(_)
            | Error::EndDateBeforeStartDate { .. }
            | Error::InvalidPeriodCount(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingIncome
            | Error::DeleteMissingIncome
            | Error::UpdateMissingPayment
            | Error::DeleteMissingPayment
            | Error::UpdateMissingAccount
            | Error::DeleteMissingAccount
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::InvalidHolidayCalendar(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            // Internal details are only intended for the server logs.
            error if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
