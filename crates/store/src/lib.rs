//! Content store access: the category vocabulary already in use and the
//! persisted application settings table.

pub mod categories;
pub mod schema;
pub mod settings;

pub use {
    categories::{CategorySource, SqliteCategorySource},
    settings::{SettingsStore, SqliteSettingsStore},
};
