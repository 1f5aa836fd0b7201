//! Validation and parsing shared by income and payment records.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, transaction::Frequency};

/// The format dates are stored in and exchanged with clients as.
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date, returning `None` if it is malformed.
pub fn parse_iso_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).ok()
}

/// Parse a date read from the database.
///
/// Rows are written with typed dates, but older rows or manual edits may
/// contain anything, so failures are logged and the caller skips the row.
pub(crate) fn parse_stored_date(raw: &str, table: &str, id: i64) -> Option<Date> {
    let date = parse_iso_date(raw);

    if date.is_none() {
        tracing::warn!("skipping {table} {id}: could not parse the stored date \"{raw}\"");
    }

    date
}

/// Trim a description, rejecting empty text.
pub(crate) fn validate_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        Err(Error::EmptyDescription)
    } else {
        Ok(description.to_owned())
    }
}

/// Reject amounts that are not positive, finite numbers.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Check `frequency_day` is in range for `frequency`.
///
/// Weekday-based frequencies take 0 (Sunday) to 6 (Saturday), monthly takes a
/// day of the month. Annual recurrence has no override.
pub fn valid_frequency_day(frequency: Frequency, frequency_day: Option<u8>) -> Option<u8> {
    frequency_day.filter(|&day| match frequency {
        Frequency::Monthly => (1..=31).contains(&day),
        Frequency::Annually => false,
        weekly => weekly.is_weekday_based() && day <= 6,
    })
}

/// Resolve the recurrence fields of a submitted transaction.
///
/// One-time transactions keep no frequency. Recurring transactions without a
/// frequency are monthly.
pub(crate) fn normalize_recurrence(
    recurring: bool,
    frequency: Option<Frequency>,
    frequency_day: Option<u8>,
) -> (Option<Frequency>, Option<u8>) {
    if !recurring {
        return (None, None);
    }

    let frequency = frequency.unwrap_or(Frequency::Monthly);

    (Some(frequency), valid_frequency_day(frequency, frequency_day))
}

/// Read a stored frequency day, dropping values that do not fit in a `u8`.
pub(crate) fn stored_frequency_day(raw: Option<i64>) -> Option<u8> {
    raw.and_then(|day| u8::try_from(day).ok())
}
