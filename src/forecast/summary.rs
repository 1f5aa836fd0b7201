//! Totals over a whole projection.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    category::CategoryId,
    forecast::{Period, projector::round2},
    transaction::{Payment, PaymentId},
};

/// The label for payments without a category.
pub(crate) const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Income, expenses and balances over all periods of a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_change: f64,
    pub start_balance: f64,
    pub end_balance: f64,
}

impl ProjectionSummary {
    /// Summarise `periods`. With no periods the end balance is the start balance.
    pub fn new(start_balance: f64, periods: &[Period]) -> Self {
        let total_income: f64 = periods
            .iter()
            .flat_map(|period| &period.income_occurrences)
            .map(|occurrence| occurrence.amount)
            .sum();
        let total_expenses: f64 = periods
            .iter()
            .flat_map(|period| &period.expense_occurrences)
            .map(|occurrence| occurrence.amount)
            .sum();
        let end_balance = periods
            .last()
            .map_or(start_balance, |period| period.running_balance);

        Self {
            total_income: round2(total_income),
            total_expenses: round2(total_expenses),
            net_change: round2(total_income - total_expenses),
            start_balance: round2(start_balance),
            end_balance,
        }
    }
}

/// The projected spending in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// `None` for the uncategorized total.
    pub category_id: Option<CategoryId>,
    pub category: String,
    /// The category's display colour, `None` for uncategorized payments.
    pub color: Option<String>,
    pub total: f64,
}

/// Total the expense occurrences of `periods` by the category of their payment.
///
/// Totals are kept per category ID, so a category named like the
/// uncategorized label still gets its own entry. Categories are sorted by
/// name with uncategorized spending last.
pub fn expenses_by_category(periods: &[Period], payments: &[Payment]) -> Vec<CategoryExpense> {
    let categories: HashMap<PaymentId, (CategoryId, &str, Option<&str>)> = payments
        .iter()
        .filter_map(|payment| match (payment.category_id, &payment.category_name) {
            (Some(id), Some(name)) => Some((
                payment.id,
                (id, name.as_str(), payment.category_color.as_deref()),
            )),
            _ => None,
        })
        .collect();

    let mut totals: HashMap<CategoryId, (&str, Option<&str>, f64)> = HashMap::new();
    let mut uncategorized: Option<f64> = None;

    let occurrences = periods
        .iter()
        .flat_map(|period| &period.expense_occurrences);

    for occurrence in occurrences {
        match categories.get(&occurrence.source_transaction_id) {
            Some(&(id, name, color)) => {
                totals.entry(id).or_insert((name, color, 0.0)).2 += occurrence.amount;
            }
            None => *uncategorized.get_or_insert(0.0) += occurrence.amount,
        }
    }

    let mut expenses: Vec<CategoryExpense> = totals
        .into_iter()
        .map(|(id, (category, color, total))| CategoryExpense {
            category_id: Some(id),
            category: category.to_owned(),
            color: color.map(str::to_owned),
            total: round2(total),
        })
        .collect();
    expenses.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(a.category_id.cmp(&b.category_id))
    });

    if let Some(total) = uncategorized {
        expenses.push(CategoryExpense {
            category_id: None,
            category: UNCATEGORIZED_LABEL.to_owned(),
            color: None,
            total: round2(total),
        });
    }

    expenses
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        forecast::{Occurrence, Period},
        transaction::{Payment, PaymentType},
    };

    use super::{CategoryExpense, ProjectionSummary, expenses_by_category};

    fn occurrence(source_transaction_id: i64, amount: f64) -> Occurrence {
        Occurrence {
            source_transaction_id,
            description: "Test".to_owned(),
            amount,
            occurrence_date: date!(2024 - 01 - 10),
            is_recurring_instance: false,
        }
    }

    fn period(income: Vec<Occurrence>, expenses: Vec<Occurrence>, running_balance: f64) -> Period {
        Period {
            label: "Jan 2024".to_owned(),
            period_start: date!(2024 - 01 - 01),
            period_end: date!(2024 - 02 - 01),
            income: income.iter().map(|o| o.amount).sum(),
            expenses: expenses.iter().map(|o| o.amount).sum(),
            net_change: 0.0,
            running_balance,
            income_occurrences: income,
            expense_occurrences: expenses,
        }
    }

    fn payment(id: i64, category: Option<(&str, &str)>) -> Payment {
        Payment {
            id,
            description: "Test".to_owned(),
            amount: 1.0,
            date: date!(2024 - 01 - 01),
            recurring: false,
            frequency: None,
            frequency_day: None,
            end_date: None,
            payment_type: PaymentType::default(),
            category_id: category.map(|_| id),
            category_name: category.map(|(name, _)| name.to_owned()),
            category_color: category.map(|(_, color)| color.to_owned()),
            account_id: None,
            account_name: None,
        }
    }

    #[test]
    fn summary_totals_all_periods() {
        let periods = vec![
            period(vec![occurrence(1, 100.0)], vec![occurrence(2, 30.0)], 170.0),
            period(vec![occurrence(1, 100.0)], vec![], 270.0),
        ];

        let summary = ProjectionSummary::new(100.0, &periods);

        assert_eq!(summary.total_income, 200.0);
        assert_eq!(summary.total_expenses, 30.0);
        assert_eq!(summary.net_change, 170.0);
        assert_eq!(summary.end_balance, 270.0);
    }

    #[test]
    fn summary_without_periods_keeps_start_balance() {
        let summary = ProjectionSummary::new(42.0, &[]);

        assert_eq!(summary.end_balance, 42.0);
        assert_eq!(summary.total_income, 0.0);
    }

    #[test]
    fn expenses_grouped_by_category_with_uncategorized_last() {
        let payments = vec![
            payment(1, Some(("Housing", "#4CAF50"))),
            payment(2, Some(("Food", "#FF9800"))),
            payment(3, None),
        ];
        let periods = vec![
            period(vec![], vec![occurrence(3, 5.0), occurrence(1, 900.0)], 0.0),
            period(vec![], vec![occurrence(2, 60.5), occurrence(2, 39.5)], 0.0),
        ];

        let expenses = expenses_by_category(&periods, &payments);

        assert_eq!(
            expenses,
            vec![
                CategoryExpense {
                    category_id: Some(2),
                    category: "Food".to_owned(),
                    color: Some("#FF9800".to_owned()),
                    total: 100.0
                },
                CategoryExpense {
                    category_id: Some(1),
                    category: "Housing".to_owned(),
                    color: Some("#4CAF50".to_owned()),
                    total: 900.0
                },
                CategoryExpense {
                    category_id: None,
                    category: "Uncategorized".to_owned(),
                    color: None,
                    total: 5.0
                },
            ]
        );
    }

    #[test]
    fn category_named_uncategorized_is_kept_apart() {
        let payments = vec![
            payment(1, Some(("Uncategorized", "#000000"))),
            payment(2, None),
        ];
        let occurrences = vec![occurrence(1, 20.0), occurrence(2, 7.0)];
        let periods = vec![period(vec![], occurrences, 0.0)];

        let expenses = expenses_by_category(&periods, &payments);

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category_id, Some(1));
        assert_eq!(expenses[0].total, 20.0);
        assert_eq!(expenses[1].category_id, None);
        assert_eq!(expenses[1].total, 7.0);
    }
}
