//! Moving transaction dates off weekends and holidays when they are entered.
//!
//! The adjustment only happens once, before a transaction is saved. The saved
//! date then anchors all recurrence calculations.

use serde::Deserialize;
use time::{Date, Weekday};

use crate::transaction::HolidayCalendar;

/// Which way to move a date that lands on a non-business day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    /// Move to the closest earlier business day.
    #[default]
    Previous,
    /// Move to the closest later business day.
    Next,
}

/// The options for adjusting a transaction date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateAdjustment {
    /// Move dates that fall on a Saturday or Sunday.
    #[serde(default)]
    pub adjust_weekends: bool,
    /// Move dates that fall on a holiday in the configured calendar.
    #[serde(default)]
    pub adjust_holidays: bool,
    /// The direction to move in.
    #[serde(default)]
    pub direction: AdjustmentDirection,
}

fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Move `date` to the nearest business day in the adjustment's direction.
///
/// A date is skipped if it is a weekend and `adjust_weekends` is set, or it is
/// in `holidays` and `adjust_holidays` is set. Dates that need no adjustment
/// are returned unchanged, as is the last representable date if stepping
/// would overflow the calendar.
pub fn adjust_date(date: Date, adjustment: &DateAdjustment, holidays: &HolidayCalendar) -> Date {
    let needs_adjustment = |candidate: Date| {
        (adjustment.adjust_weekends && is_weekend(candidate))
            || (adjustment.adjust_holidays && holidays.contains(candidate))
    };

    let mut adjusted = date;

    while needs_adjustment(adjusted) {
        let step = match adjustment.direction {
            AdjustmentDirection::Previous => adjusted.previous_day(),
            AdjustmentDirection::Next => adjusted.next_day(),
        };

        match step {
            Some(next) => adjusted = next,
            None => break,
        }
    }

    if adjusted != date {
        tracing::debug!("adjusted transaction date from {date} to {adjusted}");
    }

    adjusted
}
