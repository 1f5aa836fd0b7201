//! Recurrence frequencies and payment types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How often a recurring transaction repeats.
///
/// Unrecognised strings are read as [Frequency::Monthly], both from request
/// bodies and from rows saved by older versions of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Frequency {
    /// Every week on the same weekday.
    Weekly,
    /// Every second week on the same weekday.
    Fortnightly,
    /// Every fourth week on the same weekday.
    FourWeekly,
    /// Once a month on the same day of the month.
    Monthly,
    /// Once a year on the anniversary of the first occurrence.
    Annually,
}

impl Frequency {
    /// The name used in request bodies and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::FourWeekly => "four-weekly",
            Self::Monthly => "monthly",
            Self::Annually => "annually",
        }
    }

    /// Whether the frequency repeats on a weekday rather than a calendar day.
    pub fn is_weekday_based(self) -> bool {
        matches!(self, Self::Weekly | Self::Fortnightly | Self::FourWeekly)
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "fortnightly" => Self::Fortnightly,
            "four-weekly" | "four_weekly" | "fourweekly" => Self::FourWeekly,
            "monthly" => Self::Monthly,
            "annually" | "yearly" => Self::Annually,
            other => {
                tracing::warn!("unknown frequency \"{other}\", treating it as monthly");
                Self::Monthly
            }
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a payment is made. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Paid in cash.
    Cash,
    /// Collected by the payee from a bank account.
    #[default]
    DirectDebit,
    /// Pushed to the payee by the bank on a schedule.
    StandingOrder,
    /// Paid by debit or credit card.
    Card,
}

impl PaymentType {
    /// The name used in request bodies and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::DirectDebit => "direct_debit",
            Self::StandingOrder => "standing_order",
            Self::Card => "card",
        }
    }

    /// Parse a stored payment type, falling back to the default for unknown values.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "cash" => Self::Cash,
            "direct_debit" => Self::DirectDebit,
            "standing_order" => Self::StandingOrder,
            "card" => Self::Card,
            _ => Self::default(),
        }
    }
}
