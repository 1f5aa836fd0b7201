//! Creates the database schema and brings older databases up to date.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    account::create_account_table,
    category::{create_category_table, seed_default_categories},
    settings::{create_settings_table, ensure_settings_row},
    transaction::{create_income_table, create_payment_table},
};

/// Columns that were added after the first version of the schema.
///
/// Each entry is `(table, column, column definition)`.
const MIGRATIONS: [(&str, &str, &str); 10] = [
    ("income", "account_id", "INTEGER REFERENCES account(id)"),
    ("income", "frequency_day", "INTEGER"),
    ("payment", "account_id", "INTEGER REFERENCES account(id)"),
    ("payment", "frequency_day", "INTEGER"),
    (
        "payment",
        "payment_type",
        "TEXT NOT NULL DEFAULT 'direct_debit'",
    ),
    ("payment", "end_date", "TEXT"),
    ("payment", "category_id", "INTEGER REFERENCES category(id)"),
    ("settings", "date_format", "TEXT NOT NULL DEFAULT 'MM/DD/YYYY'"),
    ("settings", "enable_notifications", "INTEGER NOT NULL DEFAULT 0"),
    (
        "settings",
        "show_balance_in_header",
        "INTEGER NOT NULL DEFAULT 0",
    ),
];

/// Create the tables for the domain models, migrate old tables and insert the
/// default rows.
///
/// Safe to call on a database that is already initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_income_table(&transaction)?;
    create_payment_table(&transaction)?;
    create_settings_table(&transaction)?;

    for (table, column, definition) in MIGRATIONS {
        add_column_if_missing(&transaction, table, column, definition)?;
    }

    seed_default_categories(&transaction)?;
    ensure_settings_row(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn has_column(
    connection: &Connection,
    table: &str,
    column: &str,
) -> Result<bool, rusqlite::Error> {
    let mut stmt = connection.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(names.iter().any(|name| name == column))
}

fn add_column_if_missing(
    connection: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), rusqlite::Error> {
    if has_column(connection, table, column)? {
        return Ok(());
    }

    connection.execute(
        &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
        (),
    )?;
    tracing::info!("added column {column} to table {table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{has_column, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let settings_rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        let categories: i64 = connection
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();
        assert_eq!(settings_rows, 1);
        assert_eq!(categories, 7);
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn migrates_tables_from_the_first_schema() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE income (
                    id INTEGER PRIMARY KEY,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    recurring INTEGER NOT NULL DEFAULT 0,
                    frequency TEXT
                );
                CREATE TABLE payment (
                    id INTEGER PRIMARY KEY,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    recurring INTEGER NOT NULL DEFAULT 0,
                    frequency TEXT
                );
                CREATE TABLE settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    currency TEXT NOT NULL DEFAULT 'USD',
                    start_balance REAL NOT NULL DEFAULT 0
                );
                INSERT INTO payment (description, amount, date)
                VALUES ('Rent', 900, '2024-01-01');",
            )
            .unwrap();

        initialize(&connection).unwrap();

        for (table, column) in [
            ("income", "account_id"),
            ("income", "frequency_day"),
            ("payment", "payment_type"),
            ("payment", "end_date"),
            ("payment", "category_id"),
            ("settings", "date_format"),
        ] {
            assert!(
                has_column(&connection, table, column).unwrap(),
                "{table}.{column} is missing"
            );
        }

        let payment_type: String = connection
            .query_row("SELECT payment_type FROM payment", [], |row| row.get(0))
            .unwrap();
        assert_eq!(payment_type, "direct_debit");
    }
}
