#![forbid(unsafe_code)]

use super::{Category, Entity, SqliteStore, StoreError};
use rusqlite::params;
use std::collections::BTreeSet;
use tracing::{info, warn};

impl SqliteStore {
    pub fn add_category(&mut self, name: &str) -> Result<Category, StoreError> {
        let name = super::required_text(name, "category name must not be empty")?;

        let tx = self.conn.transaction()?;
        tx.execute("INSERT INTO categories(name) VALUES (?1)", params![name])
            .map_err(|err| {
                let err = super::map_insert_conflict(err, Entity::Category, &name);
                if matches!(err, StoreError::AlreadyExists { .. }) {
                    warn!(category = name.as_str(), "category already exists");
                }
                err
            })?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(category = name.as_str(), id, "category added");
        Ok(Category { id, name })
    }

    pub fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Registry names merged with the categories material types actually use.
    /// The registry is not a foreign key, so either side may hold names the
    /// other lacks.
    pub fn known_categories(&self) -> Result<Vec<String>, StoreError> {
        let mut known: BTreeSet<String> = self.list_categories()?.into_iter().collect();

        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category FROM materials WHERE category IS NOT NULL AND category<>''",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for category in rows {
            known.insert(category?);
        }
        Ok(known.into_iter().collect())
    }
}
