//! Income and payment records.
//!
//! This module contains everything related to transactions:
//! - The `Income` and `Payment` models and their database functions
//! - Recurrence frequencies and the date adjustment applied on entry
//! - The route handlers for listing, creating, updating and deleting records

pub(crate) mod core;
mod date_adjustment;
mod endpoint_state;
mod frequency;
mod holidays;
mod income;
mod income_endpoints;
mod payment;
mod payment_endpoints;

pub use date_adjustment::{AdjustmentDirection, DateAdjustment, adjust_date};
pub use frequency::{Frequency, PaymentType};
pub use holidays::HolidayCalendar;
pub use income::{Income, create_income_table, get_all_incomes};
pub use income_endpoints::{
    create_income_endpoint, delete_income_endpoint, get_incomes_endpoint, update_income_endpoint,
};
pub use payment::{Payment, PaymentId, create_payment_table, get_all_payments};
pub use payment_endpoints::{
    create_payment_endpoint, delete_payment_endpoint, get_payments_endpoint,
    update_payment_endpoint,
};
