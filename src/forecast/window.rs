//! Dashboard windows: named month ranges ending with the current month.

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::forecast::calendar::{add_months, first_of_month, month_index};

/// A preset range of whole months for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardWindow {
    /// The current month and the two before it.
    #[serde(rename = "3m")]
    ThreeMonths,
    /// The current month and the five before it.
    #[serde(rename = "6m")]
    SixMonths,
    /// January through the current month.
    #[serde(rename = "ytd")]
    YearToDate,
    /// The current month and the eleven before it.
    #[default]
    #[serde(rename = "1y", alias = "12m")]
    OneYear,
    /// From the month of the earliest transaction.
    #[serde(rename = "all")]
    All,
}

impl DashboardWindow {
    /// A human readable name for the window.
    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeMonths => "Last 3 months",
            Self::SixMonths => "Last 6 months",
            Self::YearToDate => "Year to date",
            Self::OneYear => "Last 12 months",
            Self::All => "All time",
        }
    }
}

/// Where a monthly projection starts and how many months it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionWindow {
    /// The first day of the first month.
    pub anchor_date: Date,
    /// The number of months.
    pub period_count: i64,
}

/// The window of months ending with the month of `today`.
fn trailing_months(today: Date, months: i64) -> ProjectionWindow {
    let this_month = first_of_month(today);

    ProjectionWindow {
        anchor_date: add_months(this_month, 1 - months).unwrap_or(this_month),
        period_count: months,
    }
}

/// Map a dashboard window onto a monthly projection.
///
/// `earliest` is the date of the earliest transaction and is only used by
/// [DashboardWindow::All]. Without any transactions, `All` covers the same
/// months as [DashboardWindow::OneYear].
pub fn resolve_window(
    window: DashboardWindow,
    today: Date,
    earliest: Option<Date>,
) -> ProjectionWindow {
    match window {
        DashboardWindow::ThreeMonths => trailing_months(today, 3),
        DashboardWindow::SixMonths => trailing_months(today, 6),
        DashboardWindow::OneYear => trailing_months(today, 12),
        DashboardWindow::YearToDate => ProjectionWindow {
            anchor_date: Date::from_calendar_date(today.year(), Month::January, 1)
                .unwrap_or(today),
            period_count: i64::from(u8::from(today.month())),
        },
        DashboardWindow::All => match earliest {
            Some(earliest) => {
                let start = first_of_month(earliest.min(today));

                ProjectionWindow {
                    anchor_date: start,
                    period_count: month_index(today) - month_index(start) + 1,
                }
            }
            None => trailing_months(today, 12),
        },
    }
}
