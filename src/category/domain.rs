//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for grouping payments, e.g. "Housing".
///
/// Disabled categories are hidden from pickers but stay on existing payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// A display colour, e.g. "#4CAF50".
    pub color: String,
    /// Whether the category can be picked for new payments.
    pub enabled: bool,
}

/// The colour used for categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#795548";

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_owned()
}

fn default_enabled() -> bool {
    true
}

/// The request body for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    /// The name of the category.
    pub name: String,
    /// The display colour.
    #[serde(default = "default_color")]
    pub color: String,
    /// Whether the category is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// The request body for updating a category. Missing fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    /// The new name.
    #[serde(default)]
    pub name: Option<String>,
    /// The new display colour.
    #[serde(default)]
    pub color: Option<String>,
    /// The new enabled state.
    #[serde(default)]
    pub enabled: Option<bool>,
}
