//! Projects income and payments onto a grid of periods with a running balance.
//!
//! The projector is a pure function of its input: it does not read the
//! database or the clock, so dashboards and forecasts for the same input
//! always agree.

use serde::Serialize;
use time::Date;

use crate::{
    account::AccountId,
    category::CategoryId,
    database_id::DatabaseId,
    forecast::{
        Granularity,
        period::{PeriodRange, period_grid},
        recurrence::occurs_on,
    },
    transaction::{Frequency, Income, Payment},
};

/// The fields of an income or payment the projector needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTransaction {
    /// The ID of the income or payment.
    pub id: DatabaseId,
    /// What the transaction is for.
    pub description: String,
    /// The amount per occurrence. Negative or non-finite amounts are skipped.
    pub amount: f64,
    /// The first (or only) occurrence.
    pub date: Date,
    /// Whether the transaction repeats.
    pub recurring: bool,
    /// How often the transaction repeats, monthly if missing.
    pub frequency: Option<Frequency>,
    /// Overrides the weekday (0 is Sunday) or day of the month.
    pub frequency_day: Option<u8>,
    /// The account the transaction belongs to, if any.
    pub account_id: Option<AccountId>,
    /// The last date a recurring payment may occur on. Always `None` for income.
    pub end_date: Option<Date>,
    /// The category of a payment.
    pub category_id: Option<CategoryId>,
}

impl From<&Income> for ScheduledTransaction {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id,
            description: income.description.clone(),
            amount: income.amount,
            date: income.date,
            recurring: income.recurring,
            frequency: income.frequency,
            frequency_day: income.frequency_day,
            account_id: income.account_id,
            end_date: None,
            category_id: None,
        }
    }
}

impl From<&Payment> for ScheduledTransaction {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            description: payment.description.clone(),
            amount: payment.amount,
            date: payment.date,
            recurring: payment.recurring,
            frequency: payment.frequency,
            frequency_day: payment.frequency_day,
            account_id: payment.account_id,
            end_date: payment.end_date,
            category_id: payment.category_id,
        }
    }
}

/// Everything needed to compute a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    /// Money coming in.
    pub incomes: Vec<ScheduledTransaction>,
    /// Money going out.
    pub payments: Vec<ScheduledTransaction>,
    /// The balance before the first period.
    pub start_balance: f64,
    /// The length of each period.
    pub granularity: Granularity,
    /// How many periods to produce.
    pub period_count: i64,
    /// The first day of the first period.
    pub anchor_date: Date,
}

/// A single dated instance of an income or payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    /// The ID of the income or payment this occurrence comes from.
    pub source_transaction_id: DatabaseId,
    /// The description of the source transaction.
    pub description: String,
    /// The amount of the source transaction.
    pub amount: f64,
    /// The day the occurrence falls on.
    pub occurrence_date: Date,
    /// `true` if the occurrence was generated by a recurrence rule.
    pub is_recurring_instance: bool,
}

/// The totals for one period of a projection.
///
/// The money fields are rounded to cents. The running balance is accumulated
/// from unrounded totals and rounded separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    /// A display label, e.g. "Jan 2024" or "Jan 15, 2024".
    pub label: String,
    /// The first day of the period.
    pub period_start: Date,
    /// The first day after the period.
    pub period_end: Date,
    /// The total income in the period.
    pub income: f64,
    /// The total payments in the period.
    pub expenses: f64,
    /// Income minus expenses.
    pub net_change: f64,
    /// The balance at the end of the period.
    pub running_balance: f64,
    /// The income occurrences in date order.
    pub income_occurrences: Vec<Occurrence>,
    /// The payment occurrences in date order.
    pub expense_occurrences: Vec<Occurrence>,
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn has_valid_amount(transaction: &ScheduledTransaction) -> bool {
    let is_valid = transaction.amount.is_finite() && transaction.amount >= 0.0;

    if !is_valid {
        tracing::warn!(
            "skipping transaction {} \"{}\" with invalid amount {}",
            transaction.id,
            transaction.description,
            transaction.amount
        );
    }

    is_valid
}

/// Recurring payments are gated on their start and end dates per period, income is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Income,
    Payment,
}

/// Collect the occurrences of `transactions` within `period`.
fn occurrences_in(
    transactions: &[&ScheduledTransaction],
    period: &PeriodRange,
    kind: Kind,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for transaction in transactions {
        if !transaction.recurring {
            if period.contains(transaction.date) {
                occurrences.push(Occurrence {
                    source_transaction_id: transaction.id,
                    description: transaction.description.clone(),
                    amount: transaction.amount,
                    occurrence_date: transaction.date,
                    is_recurring_instance: false,
                });
            }

            continue;
        }

        if kind == Kind::Payment {
            if period.start < transaction.date {
                continue;
            }

            match transaction.end_date {
                Some(end_date) if period.start > end_date => continue,
                _ => {}
            }
        }

        occurrences.extend(
            period
                .days()
                .filter(|day| occurs_on(transaction, *day))
                .filter(|day| transaction.end_date.is_none_or(|end| *day <= end))
                .map(|day| Occurrence {
                    source_transaction_id: transaction.id,
                    description: transaction.description.clone(),
                    amount: transaction.amount,
                    occurrence_date: day,
                    is_recurring_instance: true,
                }),
        );
    }

    occurrences.sort_by_key(|occurrence| occurrence.occurrence_date);

    occurrences
}

/// Project income and payments over `input.period_count` periods.
///
/// Transactions with a negative or non-finite amount are skipped, and a
/// non-positive period count gives no periods.
pub fn project(input: &ProjectionInput) -> Vec<Period> {
    let incomes: Vec<&ScheduledTransaction> = input
        .incomes
        .iter()
        .filter(|transaction| has_valid_amount(transaction))
        .collect();
    let payments: Vec<&ScheduledTransaction> = input
        .payments
        .iter()
        .filter(|transaction| has_valid_amount(transaction))
        .collect();

    let mut balance = input.start_balance;

    period_grid(input.anchor_date, input.granularity, input.period_count)
        .into_iter()
        .map(|range| {
            let income_occurrences = occurrences_in(&incomes, &range, Kind::Income);
            let expense_occurrences = occurrences_in(&payments, &range, Kind::Payment);

            let income: f64 = income_occurrences.iter().map(|o| o.amount).sum();
            let expenses: f64 = expense_occurrences.iter().map(|o| o.amount).sum();
            let net_change = income - expenses;
            balance += net_change;

            Period {
                label: input.granularity.label(range.start),
                period_start: range.start,
                period_end: range.end,
                income: round2(income),
                expenses: round2(expenses),
                net_change: round2(net_change),
                running_balance: round2(balance),
                income_occurrences,
                expense_occurrences,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        forecast::{Granularity, ProjectionInput, ScheduledTransaction},
        transaction::Frequency,
    };

    use super::{project, round2};

    fn one_time(id: i64, amount: f64, date: Date) -> ScheduledTransaction {
        ScheduledTransaction {
            id,
            description: format!("One-time {id}"),
            amount,
            date,
            recurring: false,
            frequency: None,
            frequency_day: None,
            account_id: None,
            end_date: None,
            category_id: None,
        }
    }

    fn recurring(id: i64, amount: f64, date: Date, frequency: Frequency) -> ScheduledTransaction {
        ScheduledTransaction {
            recurring: true,
            frequency: Some(frequency),
            ..one_time(id, amount, date)
        }
    }

    fn monthly_input(
        incomes: Vec<ScheduledTransaction>,
        payments: Vec<ScheduledTransaction>,
        period_count: i64,
    ) -> ProjectionInput {
        ProjectionInput {
            incomes,
            payments,
            start_balance: 1000.0,
            granularity: Granularity::Monthly,
            period_count,
            anchor_date: date!(2024 - 01 - 01),
        }
    }

    #[test]
    fn running_balance_scenario() {
        let bonus = one_time(1, 500.0, date!(2024 - 01 - 15));
        let rent = recurring(2, 200.0, date!(2024 - 01 - 01), Frequency::Monthly);
        let input = monthly_input(vec![bonus], vec![rent], 3);

        let periods = project(&input);

        let balances: Vec<f64> = periods.iter().map(|p| p.running_balance).collect();
        assert_eq!(balances, vec![1300.0, 1100.0, 900.0]);
        assert_eq!(periods[0].label, "Jan 2024");
        assert_eq!(periods[0].income, 500.0);
        assert_eq!(periods[0].expenses, 200.0);
        assert_eq!(periods[0].net_change, 300.0);
    }

    #[test]
    fn weekly_income_in_january() {
        let wages = recurring(1, 100.0, date!(2024 - 01 - 01), Frequency::Weekly);
        let input = monthly_input(vec![wages], vec![], 1);

        let periods = project(&input);

        assert_eq!(periods[0].income, 500.0);
        assert_eq!(periods[0].income_occurrences.len(), 5);
        assert!(
            periods[0]
                .income_occurrences
                .iter()
                .all(|occurrence| occurrence.is_recurring_instance)
        );
    }

    #[test]
    fn one_time_amount_lands_in_exactly_one_period() {
        let input = monthly_input(
            vec![one_time(1, 75.5, date!(2024 - 02 - 29))],
            vec![one_time(2, 10.0, date!(2023 - 12 - 31))],
            6,
        );

        let periods = project(&input);

        let with_income: Vec<_> = periods.iter().filter(|p| p.income > 0.0).collect();
        assert_eq!(with_income.len(), 1);
        assert_eq!(with_income[0].period_start, date!(2024 - 02 - 01));
        assert!(periods.iter().all(|p| p.expenses == 0.0));
    }

    #[test]
    fn end_dated_payment_stops() {
        let mut payment = recurring(1, 50.0, date!(2024 - 01 - 10), Frequency::Monthly);
        payment.end_date = Some(date!(2024 - 03 - 10));
        let mut input = monthly_input(vec![], vec![payment], 6);
        input.anchor_date = date!(2024 - 01 - 10);

        let periods = project(&input);

        let expenses: Vec<f64> = periods.iter().map(|p| p.expenses).collect();
        assert_eq!(expenses, vec![50.0, 50.0, 50.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn occurrences_after_end_date_are_dropped_within_a_period() {
        let mut payment = recurring(1, 20.0, date!(2024 - 01 - 01), Frequency::Weekly);
        payment.end_date = Some(date!(2024 - 01 - 10));
        let input = monthly_input(vec![], vec![payment], 1);

        let periods = project(&input);

        // Mondays 1 and 8 January only.
        assert_eq!(periods[0].expense_occurrences.len(), 2);
        assert_eq!(periods[0].expenses, 40.0);
    }

    #[test]
    fn recurring_payment_waits_for_a_period_starting_on_or_after_its_date() {
        let payment = recurring(1, 30.0, date!(2024 - 01 - 15), Frequency::Monthly);
        let input = monthly_input(vec![], vec![payment], 2);

        let periods = project(&input);

        assert_eq!(periods[0].expenses, 0.0);
        assert_eq!(periods[1].expenses, 30.0);
    }

    #[test]
    fn invalid_amounts_are_skipped() {
        let input = monthly_input(
            vec![
                one_time(1, f64::NAN, date!(2024 - 01 - 02)),
                one_time(2, -5.0, date!(2024 - 01 - 02)),
                one_time(3, f64::INFINITY, date!(2024 - 01 - 02)),
                one_time(4, 5.0, date!(2024 - 01 - 02)),
            ],
            vec![],
            1,
        );

        let periods = project(&input);

        assert_eq!(periods[0].income, 5.0);
        assert_eq!(periods[0].income_occurrences.len(), 1);
    }

    #[test]
    fn balance_is_continuous_between_periods() {
        let pay = recurring(1, 333.33, date!(2024 - 01 - 03), Frequency::Fortnightly);
        let input = monthly_input(
            vec![pay],
            vec![
                recurring(2, 99.99, date!(2024 - 01 - 01), Frequency::Weekly),
                one_time(3, 0.01, date!(2024 - 05 - 17)),
            ],
            12,
        );

        let periods = project(&input);

        let mut previous = input.start_balance;
        for period in &periods {
            let expected = previous + period.income - period.expenses;
            assert!((period.running_balance - expected).abs() <= 0.01 + 1e-9);
            previous = period.running_balance;
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let salary = recurring(1, 1200.0, date!(2023 - 11 - 30), Frequency::Monthly);
        let gym = recurring(2, 45.0, date!(2024 - 01 - 01), Frequency::FourWeekly);
        let input = monthly_input(vec![salary], vec![gym], 12);

        assert_eq!(project(&input), project(&input));
    }

    #[test]
    fn daily_granularity_labels_each_day() {
        let mut input = monthly_input(vec![one_time(1, 10.0, date!(2024 - 01 - 02))], vec![], 3);
        input.granularity = Granularity::Daily;

        let periods = project(&input);

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[1].label, "Jan 2, 2024");
        assert_eq!(periods[1].income, 10.0);
        assert_eq!(periods[2].running_balance, 1010.0);
    }

    #[test]
    fn rounding_is_to_cents() {
        assert_eq!(round2(1.005 + 0.0001), 1.01);
        assert_eq!(round2(-2.344), -2.34);
    }
}
