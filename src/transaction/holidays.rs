//! The holiday calendar used when adjusting transaction dates.

use std::{collections::HashSet, fs, path::Path};

use time::{Date, macros::date};

use crate::{Error, transaction::core::parse_iso_date};

/// UK bank holidays (England and Wales) from 2024 to 2030, including substitute days.
const UK_BANK_HOLIDAYS: [Date; 56] = [
    date!(2024 - 01 - 01),
    date!(2024 - 03 - 29),
    date!(2024 - 04 - 01),
    date!(2024 - 05 - 06),
    date!(2024 - 05 - 27),
    date!(2024 - 08 - 26),
    date!(2024 - 12 - 25),
    date!(2024 - 12 - 26),
    date!(2025 - 01 - 01),
    date!(2025 - 04 - 18),
    date!(2025 - 04 - 21),
    date!(2025 - 05 - 05),
    date!(2025 - 05 - 26),
    date!(2025 - 08 - 25),
    date!(2025 - 12 - 25),
    date!(2025 - 12 - 26),
    date!(2026 - 01 - 01),
    date!(2026 - 04 - 03),
    date!(2026 - 04 - 06),
    date!(2026 - 05 - 04),
    date!(2026 - 05 - 25),
    date!(2026 - 08 - 31),
    date!(2026 - 12 - 25),
    date!(2026 - 12 - 28),
    date!(2027 - 01 - 01),
    date!(2027 - 03 - 26),
    date!(2027 - 03 - 29),
    date!(2027 - 05 - 03),
    date!(2027 - 05 - 31),
    date!(2027 - 08 - 30),
    date!(2027 - 12 - 27),
    date!(2027 - 12 - 28),
    date!(2028 - 01 - 03),
    date!(2028 - 04 - 14),
    date!(2028 - 04 - 17),
    date!(2028 - 05 - 01),
    date!(2028 - 05 - 29),
    date!(2028 - 08 - 28),
    date!(2028 - 12 - 25),
    date!(2028 - 12 - 26),
    date!(2029 - 01 - 01),
    date!(2029 - 03 - 30),
    date!(2029 - 04 - 02),
    date!(2029 - 05 - 07),
    date!(2029 - 05 - 28),
    date!(2029 - 08 - 27),
    date!(2029 - 12 - 25),
    date!(2029 - 12 - 26),
    date!(2030 - 01 - 01),
    date!(2030 - 04 - 19),
    date!(2030 - 04 - 22),
    date!(2030 - 05 - 06),
    date!(2030 - 05 - 27),
    date!(2030 - 08 - 26),
    date!(2030 - 12 - 25),
    date!(2030 - 12 - 26),
];

/// A set of non-business days, other than weekends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar {
    dates: HashSet<Date>,
}

impl HolidayCalendar {
    /// Create a calendar from a list of dates.
    pub fn from_dates(dates: impl IntoIterator<Item = Date>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// The built-in calendar of UK bank holidays.
    pub fn uk_bank_holidays() -> Self {
        Self::from_dates(UK_BANK_HOLIDAYS)
    }

    /// Load a calendar from a text file with one `YYYY-MM-DD` date per line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidHolidayCalendar] if the file cannot be read or a
    /// line is not a valid date.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|error| {
            Error::InvalidHolidayCalendar(format!("{}: {error}", path.display()))
        })?;

        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, Error> {
        let mut dates = HashSet::new();

        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let date = parse_iso_date(line).ok_or_else(|| {
                Error::InvalidHolidayCalendar(format!(
                    "line {}: \"{line}\" is not a YYYY-MM-DD date",
                    line_number + 1
                ))
            })?;

            dates.insert(date);
        }

        Ok(Self { dates })
    }

    /// Whether `date` is a holiday.
    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// The number of holidays in the calendar.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the calendar has no holidays at all.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
