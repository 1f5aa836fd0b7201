//! Category management for grouping payments.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, get_all_categories, get_category,
    seed_default_categories, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryForm, CategoryId, CategoryName, CategoryUpdate};
pub use edit::update_category_endpoint;
pub use list::get_categories_endpoint;
