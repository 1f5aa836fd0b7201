//! Rules for which days a recurring transaction falls on.

use time::{Date, Weekday};

use crate::{
    forecast::{ScheduledTransaction, calendar::last_day_of_month, calendar::month_index},
    transaction::{Frequency, core::valid_frequency_day},
};

/// Convert a day number where 0 is Sunday into a [Weekday].
fn weekday_from_sunday(day: u8) -> Weekday {
    match day {
        0 => Weekday::Sunday,
        1 => Weekday::Monday,
        2 => Weekday::Tuesday,
        3 => Weekday::Wednesday,
        4 => Weekday::Thursday,
        5 => Weekday::Friday,
        _ => Weekday::Saturday,
    }
}

/// Whether a recurring transaction has an occurrence on `day`.
///
/// Only the recurrence rule is checked here. End dates are handled by the
/// projector.
pub(crate) fn occurs_on(transaction: &ScheduledTransaction, day: Date) -> bool {
    let start = transaction.date;
    let frequency = transaction.frequency.unwrap_or(Frequency::Monthly);
    let frequency_day = valid_frequency_day(frequency, transaction.frequency_day);

    match frequency {
        Frequency::Weekly => matches_weekday(start, frequency_day, day, 1),
        Frequency::Fortnightly => matches_weekday(start, frequency_day, day, 2),
        Frequency::FourWeekly => matches_weekday(start, frequency_day, day, 4),
        Frequency::Monthly => {
            let target = frequency_day.unwrap_or(start.day());
            let clamped = target.min(last_day_of_month(day.year(), day.month()));

            day.day() == clamped && month_index(day) >= month_index(start)
        }
        Frequency::Annually => {
            day >= start && day.month() == start.month() && day.day() == start.day()
        }
    }
}

/// Weekday based recurrence every `interval_weeks` weeks counted from `start`.
fn matches_weekday(
    start: Date,
    frequency_day: Option<u8>,
    day: Date,
    interval_weeks: i64,
) -> bool {
    let weekday = frequency_day.map_or(start.weekday(), weekday_from_sunday);

    if day < start || day.weekday() != weekday {
        return false;
    }

    let whole_weeks = (day - start).whole_days() / 7;

    whole_weeks % interval_weeks == 0
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::date};

    use crate::{forecast::ScheduledTransaction, transaction::Frequency};

    use super::occurs_on;

    fn recurring(
        date: time::Date,
        frequency: Frequency,
        frequency_day: Option<u8>,
    ) -> ScheduledTransaction {
        ScheduledTransaction {
            id: 1,
            description: "Test".to_owned(),
            amount: 10.0,
            date,
            recurring: true,
            frequency: Some(frequency),
            frequency_day,
            account_id: None,
            end_date: None,
            category_id: None,
        }
    }

    fn matching_days(
        transaction: &ScheduledTransaction,
        from: time::Date,
        days: i64,
    ) -> Vec<time::Date> {
        (0..days)
            .map(|offset| from + Duration::days(offset))
            .filter(|day| occurs_on(transaction, *day))
            .collect()
    }

    #[test]
    fn weekly_matches_same_weekday_from_start() {
        let transaction = recurring(date!(2024 - 01 - 03), Frequency::Weekly, None);

        let days = matching_days(&transaction, date!(2023 - 12 - 25), 21);

        assert_eq!(days, vec![date!(2024 - 01 - 03), date!(2024 - 01 - 10)]);
    }

    #[test]
    fn weekly_frequency_day_overrides_weekday() {
        // 5 is Friday.
        let transaction = recurring(date!(2024 - 01 - 01), Frequency::Weekly, Some(5));

        let days = matching_days(&transaction, date!(2024 - 01 - 01), 14);

        assert_eq!(days, vec![date!(2024 - 01 - 05), date!(2024 - 01 - 12)]);
    }

    #[test]
    fn fortnightly_is_every_fourteen_days() {
        let transaction = recurring(date!(2024 - 01 - 05), Frequency::Fortnightly, None);

        let days = matching_days(&transaction, date!(2024 - 01 - 01), 90);

        assert!(days.len() > 2);
        assert_eq!(days[0], date!(2024 - 01 - 05));
        for pair in days.windows(2) {
            assert_eq!((pair[1] - pair[0]).whole_days(), 14);
        }
    }

    #[test]
    fn four_weekly_is_every_twenty_eight_days() {
        let transaction = recurring(date!(2024 - 01 - 05), Frequency::FourWeekly, None);

        let days = matching_days(&transaction, date!(2024 - 01 - 01), 60);

        assert_eq!(days, vec![date!(2024 - 01 - 05), date!(2024 - 02 - 02)]);
    }

    #[test]
    fn monthly_day_31_is_clamped() {
        let transaction = recurring(date!(2023 - 01 - 31), Frequency::Monthly, Some(31));

        let days = matching_days(&transaction, date!(2023 - 01 - 01), 365);

        assert_eq!(days.len(), 12);
        assert!(days.contains(&date!(2023 - 02 - 28)));
        assert!(days.contains(&date!(2023 - 04 - 30)));
    }

    #[test]
    fn monthly_never_matches_before_start_month() {
        let transaction = recurring(date!(2024 - 03 - 15), Frequency::Monthly, None);

        assert!(!occurs_on(&transaction, date!(2024 - 02 - 15)));
        assert!(occurs_on(&transaction, date!(2024 - 03 - 15)));
        assert!(occurs_on(&transaction, date!(2025 - 01 - 15)));
    }

    #[test]
    fn annual_leap_day_only_in_leap_years() {
        let transaction = recurring(date!(2024 - 02 - 29), Frequency::Annually, None);

        let days = matching_days(&transaction, date!(2024 - 01 - 01), 365 * 5);

        assert_eq!(days, vec![date!(2024 - 02 - 29), date!(2028 - 02 - 29)]);
    }

    #[test]
    fn missing_frequency_is_monthly() {
        let mut transaction = recurring(date!(2024 - 01 - 10), Frequency::Weekly, None);
        transaction.frequency = None;

        assert!(occurs_on(&transaction, date!(2024 - 02 - 10)));
        assert!(!occurs_on(&transaction, date!(2024 - 01 - 17)));
    }
}
