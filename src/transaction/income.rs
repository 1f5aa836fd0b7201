//! Income records: money coming in, once or on a schedule.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    database_id::DatabaseId,
    transaction::{
        DateAdjustment, Frequency, HolidayCalendar, adjust_date,
        core::{
            normalize_recurrence, parse_stored_date, stored_frequency_day, validate_amount,
            validate_description,
        },
    },
};

/// Database identifier for an income record.
pub type IncomeId = DatabaseId;

/// An income record joined with the name of its account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Income {
    /// The ID of the income record.
    pub id: IncomeId,
    /// What the income is for, e.g. "Salary".
    pub description: String,
    /// The positive amount received per occurrence.
    pub amount: f64,
    /// The first (or only) date the income is received.
    pub date: Date,
    /// Whether the income repeats.
    pub recurring: bool,
    /// How often the income repeats, only set for recurring income.
    pub frequency: Option<Frequency>,
    /// Overrides the weekday or day of the month the income repeats on.
    pub frequency_day: Option<u8>,
    /// The account the income is paid into.
    pub account_id: Option<AccountId>,
    /// The name of the account the income is paid into.
    pub account_name: Option<String>,
}

/// The request body for creating or replacing an income record.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeForm {
    pub description: String,
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub frequency_day: Option<u8>,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Move `date` off weekends or holidays before saving.
    #[serde(default)]
    pub date_adjustment: Option<DateAdjustment>,
}

/// A validated income record ready to be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub recurring: bool,
    pub frequency: Option<Frequency>,
    pub frequency_day: Option<u8>,
    pub account_id: Option<AccountId>,
}

impl IncomeForm {
    /// Validate the form and apply the requested date adjustment.
    ///
    /// # Errors
    /// Returns [Error::EmptyDescription] or [Error::InvalidAmount] for bad input.
    pub fn validate(self, holidays: &HolidayCalendar) -> Result<NewIncome, Error> {
        let description = validate_description(&self.description)?;
        let amount = validate_amount(self.amount)?;
        let date = match &self.date_adjustment {
            Some(adjustment) => adjust_date(self.date, adjustment, holidays),
            None => self.date,
        };
        let (frequency, frequency_day) =
            normalize_recurrence(self.recurring, self.frequency, self.frequency_day);

        Ok(NewIncome {
            description,
            amount,
            date,
            recurring: self.recurring,
            frequency,
            frequency_day,
            account_id: self.account_id,
        })
    }
}

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            recurring INTEGER NOT NULL DEFAULT 0,
            frequency TEXT,
            frequency_day INTEGER,
            account_id INTEGER REFERENCES account(id)
        )",
        (),
    )?;

    Ok(())
}

const SELECT_INCOME: &str = "SELECT income.id, income.description, income.amount, income.date, \
    income.recurring, income.frequency, income.frequency_day, income.account_id, account.name \
    FROM income LEFT JOIN account ON account.id = income.account_id";

/// Map a joined income row, returning `None` when the stored date is invalid.
fn map_row(row: &Row) -> Result<Option<Income>, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_date: String = row.get(3)?;

    let Some(date) = parse_stored_date(&raw_date, "income", id) else {
        return Ok(None);
    };

    let recurring: bool = row.get(4)?;
    let frequency = row
        .get::<_, Option<String>>(5)?
        .map(Frequency::from)
        .or(recurring.then_some(Frequency::Monthly));

    Ok(Some(Income {
        id,
        description: row.get(1)?,
        amount: row.get(2)?,
        date,
        recurring,
        frequency,
        frequency_day: stored_frequency_day(row.get(6)?),
        account_id: row.get(7)?,
        account_name: row.get(8)?,
    }))
}

/// Save a new income record and return it as it would be listed.
pub fn create_income(income: &NewIncome, connection: &Connection) -> Result<Income, Error> {
    connection.execute(
        "INSERT INTO income (
            description, amount, date, recurring, frequency, frequency_day, account_id
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            income.description,
            income.amount,
            income.date,
            income.recurring,
            income.frequency.map(Frequency::as_str),
            income.frequency_day,
            income.account_id,
        ],
    )?;

    get_income(connection.last_insert_rowid(), connection)
}

/// Get a single income record by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such record or its date is unreadable.
pub fn get_income(id: IncomeId, connection: &Connection) -> Result<Income, Error> {
    connection
        .query_row(&format!("{SELECT_INCOME} WHERE income.id = ?1"), [id], map_row)?
        .ok_or(Error::NotFound)
}

/// Get every readable income record, most recent first.
pub fn get_all_incomes(connection: &Connection) -> Result<Vec<Income>, Error> {
    let incomes = connection
        .prepare(&format!("{SELECT_INCOME} ORDER BY income.date DESC, income.id DESC"))?
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(incomes.into_iter().flatten().collect())
}

/// Replace the fields of an existing income record.
///
/// # Errors
/// Returns [Error::UpdateMissingIncome] if there is no record with `id`.
pub fn update_income(
    id: IncomeId,
    income: &NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    let rows_affected = connection.execute(
        "UPDATE income SET description = ?1, amount = ?2, date = ?3, recurring = ?4,
            frequency = ?5, frequency_day = ?6, account_id = ?7
        WHERE id = ?8",
        params![
            income.description,
            income.amount,
            income.date,
            income.recurring,
            income.frequency.map(Frequency::as_str),
            income.frequency_day,
            income.account_id,
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIncome);
    }

    get_income(id, connection)
}

/// Delete an income record.
///
/// # Errors
/// Returns [Error::DeleteMissingIncome] if there is no record with `id`.
pub fn delete_income(id: IncomeId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM income WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}
