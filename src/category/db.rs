//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// The categories a fresh database starts with.
const DEFAULT_CATEGORIES: [(&str, &str); 7] = [
    ("Housing", "#4CAF50"),
    ("Transportation", "#2196F3"),
    ("Food", "#FF9800"),
    ("Utilities", "#9C27B0"),
    ("Health", "#F44336"),
    ("Entertainment", "#673AB7"),
    ("Other", "#795548"),
];

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    color: &str,
    enabled: bool,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, color, enabled) VALUES (?1, ?2, ?3);",
        (name.as_ref(), color, enabled),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        color: color.to_owned(),
        enabled,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, enabled FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, enabled FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace a category's name, colour and enabled state.
///
/// Returns an error if the category doesn't exist.
pub fn update_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, color = ?2, enabled = ?3 WHERE id = ?4",
        (
            category.name.as_ref(),
            &category.color,
            category.enabled,
            category.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID, unassigning it from any payments first.
///
/// Returns an error if the category doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "UPDATE payment SET category_id = NULL WHERE category_id = ?1",
        [category_id],
    )?;
    let rows_affected = transaction.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// Insert the default categories if the table is empty.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    let mut stmt = connection.prepare("INSERT INTO category (name, color) VALUES (?1, ?2)")?;

    for (name, color) in DEFAULT_CATEGORIES {
        stmt.execute((name, color))?;
    }

    tracing::info!("added {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let color = row.get(2)?;
    let enabled = row.get(3)?;

    Ok(Category {
        id,
        name,
        color,
        enabled,
    })
}
