#![forbid(unsafe_code)]

use super::{MaterialSummary, Person, SqliteStore, StoreError};

impl SqliteStore {
    /// Case-insensitive substring match on code, name or category, ordered by
    /// name. Blank text returns the full listing.
    pub fn search_materials(&self, text: &str) -> Result<Vec<MaterialSummary>, StoreError> {
        let all = self.list_materials()?;
        let Some(needle) = needle(text) else {
            return Ok(all);
        };
        Ok(all
            .into_iter()
            .filter(|material| {
                contains_folded(&material.code, &needle)
                    || contains_folded(&material.name, &needle)
                    || material
                        .category
                        .as_deref()
                        .is_some_and(|category| contains_folded(category, &needle))
            })
            .collect())
    }

    /// Case-insensitive substring match on name or branch, ordered by name.
    pub fn search_people(&self, text: &str) -> Result<Vec<Person>, StoreError> {
        let all = self.list_people()?;
        let Some(needle) = needle(text) else {
            return Ok(all);
        };
        Ok(all
            .into_iter()
            .filter(|person| {
                contains_folded(&person.name, &needle)
                    || person
                        .branch
                        .as_deref()
                        .is_some_and(|branch| contains_folded(branch, &needle))
            })
            .collect())
    }
}

// SQLite's LIKE folds ASCII only; names here are often Turkish.
fn needle(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_lowercase())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
