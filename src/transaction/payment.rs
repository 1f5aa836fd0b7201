//! Payment records: money going out, once or on a schedule until an end date.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    category::CategoryId,
    database_id::DatabaseId,
    transaction::{
        DateAdjustment, Frequency, HolidayCalendar, PaymentType, adjust_date,
        core::{
            normalize_recurrence, parse_iso_date, parse_stored_date, stored_frequency_day,
            validate_amount, validate_description,
        },
    },
};

/// Database identifier for a payment.
pub type PaymentId = DatabaseId;

/// A payment joined with the names of its category and account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    /// The ID of the payment.
    pub id: PaymentId,
    /// What the payment is for, e.g. "Rent".
    pub description: String,
    /// The positive amount paid per occurrence.
    pub amount: f64,
    /// The first (or only) date the payment is made.
    pub date: Date,
    /// Whether the payment repeats.
    pub recurring: bool,
    /// How often the payment repeats, only set for recurring payments.
    pub frequency: Option<Frequency>,
    /// Overrides the weekday or day of the month the payment repeats on.
    pub frequency_day: Option<u8>,
    /// The last date a recurring payment can occur on.
    pub end_date: Option<Date>,
    /// How the payment is made.
    pub payment_type: PaymentType,
    /// The category the payment is grouped under.
    pub category_id: Option<CategoryId>,
    /// The name of the category.
    pub category_name: Option<String>,
    /// The display colour of the category.
    pub category_color: Option<String>,
    /// The account the payment is made from.
    pub account_id: Option<AccountId>,
    /// The name of the account.
    pub account_name: Option<String>,
}

/// The request body for creating or replacing a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentForm {
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
    pub end_date: Option<Date>,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Move `date` off weekends or holidays before saving.
    #[serde(default)]
    pub date_adjustment: Option<DateAdjustment>,
}

/// A validated payment ready to be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub recurring: bool,
    pub frequency: Option<Frequency>,
    pub frequency_day: Option<u8>,
    pub end_date: Option<Date>,
    pub payment_type: PaymentType,
    pub category_id: Option<CategoryId>,
    pub account_id: Option<AccountId>,
}

impl PaymentForm {
    /// Validate the form and apply the requested date adjustment.
    ///
    /// The end date is checked against the adjusted date and dropped for
    /// one-time payments.
    pub fn validate(self, holidays: &HolidayCalendar) -> Result<NewPayment, Error> {
        let description = validate_description(&self.description)?;
        let amount = validate_amount(self.amount)?;
        let date = match &self.date_adjustment {
            Some(adjustment) => adjust_date(self.date, adjustment, holidays),
            None => self.date,
        };
        let (frequency, frequency_day) =
            normalize_recurrence(self.recurring, self.frequency, self.frequency_day);

        let end_date = self.end_date.filter(|_| self.recurring);

        match end_date {
            Some(end_date) if end_date < date => {
                return Err(Error::EndDateBeforeStartDate { date, end_date });
            }
            _ => {}
        }

        Ok(NewPayment {
            description,
            amount,
            date,
            recurring: self.recurring,
            frequency,
            frequency_day,
            end_date,
            payment_type: self.payment_type,
            category_id: self.category_id,
            account_id: self.account_id,
        })
    }
}

pub fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            recurring INTEGER NOT NULL DEFAULT 0,
            frequency TEXT,
            frequency_day INTEGER,
            end_date TEXT,
            payment_type TEXT NOT NULL DEFAULT 'direct_debit',
            category_id INTEGER REFERENCES category(id),
            account_id INTEGER REFERENCES account(id)
        )",
        (),
    )?;

    Ok(())
}

const SELECT_PAYMENT: &str = "SELECT payment.id, payment.description, payment.amount, \
    payment.date, payment.recurring, payment.frequency, payment.frequency_day, \
    payment.end_date, payment.payment_type, payment.category_id, category.name, \
    category.color, payment.account_id, account.name \
    FROM payment \
    LEFT JOIN category ON category.id = payment.category_id \
    LEFT JOIN account ON account.id = payment.account_id";

/// Map a joined payment row, returning `None` when the stored date is invalid.
///
/// An unreadable end date is dropped rather than skipping the whole payment.
fn map_row(row: &Row) -> Result<Option<Payment>, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_date: String = row.get(3)?;

    let Some(date) = parse_stored_date(&raw_date, "payment", id) else {
        return Ok(None);
    };

    let recurring: bool = row.get(4)?;
    let frequency = row
        .get::<_, Option<String>>(5)?
        .map(Frequency::from)
        .or(recurring.then_some(Frequency::Monthly));
    let end_date = row
        .get::<_, Option<String>>(7)?
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| {
            let end_date = parse_iso_date(&raw);
            if end_date.is_none() {
                tracing::warn!("ignoring the end date \"{raw}\" of payment {id}");
            }
            end_date
        });
    let payment_type = row
        .get::<_, Option<String>>(8)?
        .map(|raw| PaymentType::from_stored(&raw))
        .unwrap_or_default();

    Ok(Some(Payment {
        id,
        description: row.get(1)?,
        amount: row.get(2)?,
        date,
        recurring,
        frequency,
        frequency_day: stored_frequency_day(row.get(6)?),
        end_date,
        payment_type,
        category_id: row.get(9)?,
        category_name: row.get(10)?,
        category_color: row.get(11)?,
        account_id: row.get(12)?,
        account_name: row.get(13)?,
    }))
}

/// Save a new payment and return it as it would be listed.
pub fn create_payment(payment: &NewPayment, connection: &Connection) -> Result<Payment, Error> {
    connection.execute(
        "INSERT INTO payment (description, amount, date, recurring, frequency, frequency_day,
            end_date, payment_type, category_id, account_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            payment.description,
            payment.amount,
            payment.date,
            payment.recurring,
            payment.frequency.map(Frequency::as_str),
            payment.frequency_day,
            payment.end_date,
            payment.payment_type.as_str(),
            payment.category_id,
            payment.account_id,
        ],
    )?;

    get_payment(connection.last_insert_rowid(), connection)
}

/// Get a single payment by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such payment or its date is unreadable.
pub fn get_payment(id: PaymentId, connection: &Connection) -> Result<Payment, Error> {
    connection
        .query_row(&format!("{SELECT_PAYMENT} WHERE payment.id = ?1"), [id], map_row)?
        .ok_or(Error::NotFound)
}

/// Get every readable payment, most recent first.
pub fn get_all_payments(connection: &Connection) -> Result<Vec<Payment>, Error> {
    let payments = connection
        .prepare(&format!(
            "{SELECT_PAYMENT} ORDER BY payment.date DESC, payment.id DESC"
        ))?
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(payments.into_iter().flatten().collect())
}

/// Replace the fields of an existing payment.
///
/// # Errors
/// Returns [Error::UpdateMissingPayment] if there is no payment with `id`.
pub fn update_payment(
    id: PaymentId,
    payment: &NewPayment,
    connection: &Connection,
) -> Result<Payment, Error> {
    let rows_affected = connection.execute(
        "UPDATE payment SET description = ?1, amount = ?2, date = ?3, recurring = ?4,
            frequency = ?5, frequency_day = ?6, end_date = ?7, payment_type = ?8,
            category_id = ?9, account_id = ?10
        WHERE id = ?11",
        params![
            payment.description,
            payment.amount,
            payment.date,
            payment.recurring,
            payment.frequency.map(Frequency::as_str),
            payment.frequency_day,
            payment.end_date,
            payment.payment_type.as_str(),
            payment.category_id,
            payment.account_id,
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPayment);
    }

    get_payment(id, connection)
}

/// Delete a payment.
///
/// # Errors
/// Returns [Error::DeleteMissingPayment] if there is no payment with `id`.
pub fn delete_payment(id: PaymentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM payment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPayment);
    }

    Ok(())
}
