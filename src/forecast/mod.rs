//! The recurring transaction projector and the forecast and dashboard
//! endpoints built on it.
//!
//! Both endpoints load the same snapshot, apply the same account filter and
//! call the same [project] function. They only differ in how the first period
//! and the number of periods are chosen.

mod calendar;
mod endpoint;
mod filter;
mod period;
mod projector;
mod recurrence;
mod summary;
mod window;

pub use endpoint::{MAX_FORECAST_PERIODS, get_dashboard_endpoint, get_forecast_endpoint};
pub use filter::filter_by_accounts;
pub use period::Granularity;
pub use projector::{Occurrence, Period, ProjectionInput, ScheduledTransaction, project};
pub use window::{DashboardWindow, ProjectionWindow, resolve_window};
