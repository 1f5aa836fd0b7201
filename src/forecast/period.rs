//! The grid of consecutive periods a projection is reported in.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::forecast::calendar::add_months;

const MONTH_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [year]");
const DAY_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// The length of each period in a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One day per period.
    Daily,
    /// Seven days per period.
    Weekly,
    /// One calendar month per period.
    #[default]
    Monthly,
}

/// The half-open date range `[start, end)` of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PeriodRange {
    pub start: Date,
    pub end: Date,
}

impl PeriodRange {
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Every day in the period, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        std::iter::successors(Some(self.start), |day| day.next_day())
            .take_while(|day| *day < self.end)
    }
}

impl Granularity {
    /// The start of period `index` counted from `anchor`.
    fn period_start(self, anchor: Date, index: i64) -> Option<Date> {
        match self {
            Self::Daily => anchor.checked_add(Duration::days(index)),
            Self::Weekly => anchor.checked_add(Duration::weeks(index)),
            Self::Monthly => add_months(anchor, index),
        }
    }

    /// The display label for a period starting on `start`.
    pub(crate) fn label(self, start: Date) -> String {
        let format = match self {
            Self::Monthly => MONTH_LABEL_FORMAT,
            Self::Weekly | Self::Daily => DAY_LABEL_FORMAT,
        };

        start.format(format).unwrap_or_else(|_| start.to_string())
    }
}

/// Build `count` consecutive periods starting at `anchor`.
///
/// Monthly periods are computed from the anchor each time so a day that is
/// clamped in a short month is restored in the next long one. The grid stops
/// early if a period would end past the last representable date.
pub(crate) fn period_grid(
    anchor: Date,
    granularity: Granularity,
    count: i64,
) -> Vec<PeriodRange> {
    if count <= 0 {
        return Vec::new();
    }

    let mut periods = Vec::new();

    for index in 0..count {
        let (Some(start), Some(end)) = (
            granularity.period_start(anchor, index),
            granularity.period_start(anchor, index + 1),
        ) else {
            tracing::warn!("stopping the period grid after {index} periods at the calendar limit");
            break;
        };

        periods.push(PeriodRange { start, end });
    }

    periods
}
