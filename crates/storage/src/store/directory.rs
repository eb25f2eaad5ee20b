#![forbid(unsafe_code)]

use super::support::{
    OWNERSHIP_COLUMNS, PERSON_COLUMNS, ownership_from_row, person_by_id, person_by_name,
    person_from_row,
};
use super::{
    AddPersonRequest, Entity, OwnershipRecord, Person, SqliteStore, StoreError,
    UpdatePersonRequest,
};
use rusqlite::{OptionalExtension, params};
use sr_core::model::is_known_branch;
use tracing::{debug, info, warn};

impl SqliteStore {
    pub fn add_person(&mut self, request: AddPersonRequest) -> Result<Person, StoreError> {
        let name = super::canonical_person_name(&request.name)?;
        let branch = super::optional_text(request.branch.as_deref());
        if let Some(branch) = branch.as_deref().filter(|b| !is_known_branch(b)) {
            debug!(branch, "branch is outside the known site list");
        }

        let tx = self.conn.transaction()?;
        if person_by_name(&tx, name.as_str())?.is_some() {
            warn!(person = name.as_str(), "person already exists");
            return Err(StoreError::already_exists(Entity::Person, name.as_str()));
        }
        tx.execute(
            "INSERT INTO people(name, floor, branch, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![name.as_str(), request.floor, branch, request.created_at_ms],
        )
        .map_err(|err| super::map_insert_conflict(err, Entity::Person, name.as_str()))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(person = name.as_str(), id, "person added");
        Ok(Person {
            id,
            name: name.into_string(),
            floor: request.floor,
            branch,
        })
    }

    /// Updates name, floor and branch. Custody is keyed by person id, so a
    /// rename carries the person's ownership records along in the same
    /// transaction.
    pub fn update_person(&mut self, request: UpdatePersonRequest) -> Result<Person, StoreError> {
        let name = request
            .name
            .as_deref()
            .map(super::canonical_person_name)
            .transpose()?;
        let branch = request.branch.as_deref().map(str::trim);
        if name.is_none() && request.floor.is_none() && branch.is_none() {
            return Err(StoreError::InvalidInput("nothing to update"));
        }

        let tx = self.conn.transaction()?;
        let existing = person_by_id(&tx, request.id)?
            .ok_or_else(|| StoreError::not_found(Entity::Person, request.id.to_string()))?;

        if let Some(name) = &name {
            let taken = tx
                .query_row(
                    "SELECT id FROM people WHERE name=?1 AND id<>?2",
                    params![name.as_str(), request.id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            if taken.is_some() {
                warn!(
                    person = existing.name.as_str(),
                    new_name = name.as_str(),
                    "rename collides with another person"
                );
                return Err(StoreError::NameConflict {
                    name: name.as_str().to_string(),
                });
            }
            tx.execute(
                "UPDATE people SET name=?2 WHERE id=?1",
                params![request.id, name.as_str()],
            )
            .map_err(|err| {
                if super::is_constraint_violation(&err) {
                    StoreError::NameConflict {
                        name: name.as_str().to_string(),
                    }
                } else {
                    StoreError::Sql(err)
                }
            })?;
        }
        if let Some(floor) = request.floor {
            tx.execute(
                "UPDATE people SET floor=?2 WHERE id=?1",
                params![request.id, floor],
            )?;
        }
        if let Some(branch) = branch {
            let branch = (!branch.is_empty()).then_some(branch);
            tx.execute(
                "UPDATE people SET branch=?2 WHERE id=?1",
                params![request.id, branch],
            )?;
        }
        tx.execute(
            "UPDATE people SET updated_at_ms=MAX(updated_at_ms, ?2) WHERE id=?1",
            params![request.id, request.updated_at_ms],
        )?;

        let updated = person_by_id(&tx, request.id)?
            .ok_or_else(|| StoreError::not_found(Entity::Person, request.id.to_string()))?;
        tx.commit()?;

        if updated.name != existing.name {
            info!(
                id = request.id,
                from = existing.name.as_str(),
                to = updated.name.as_str(),
                "person renamed"
            );
        } else {
            info!(id = request.id, person = updated.name.as_str(), "person updated");
        }
        Ok(updated)
    }

    /// Deletes the person together with every ownership record they hold.
    /// Does not require the person's custody to be empty.
    pub fn delete_person(&mut self, id: i64) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let Some(person) = person_by_id(&tx, id)? else {
            return Ok(false);
        };
        let released = tx.execute("DELETE FROM ownership WHERE person_id=?1", params![id])?;
        tx.execute("DELETE FROM people WHERE id=?1", params![id])?;
        tx.commit()?;

        info!(
            id,
            person = person.name.as_str(),
            records_dropped = released,
            "person deleted"
        );
        Ok(true)
    }

    pub fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM people ORDER BY name ASC"
        ))?;
        let rows = stmt.query_map([], person_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn person_get(&self, name: &str) -> Result<Option<Person>, StoreError> {
        let name = super::canonical_person_name(name)?;
        person_by_name(&self.conn, name.as_str())
    }

    /// Ownership records of a person, most recent first. Unknown, blank or
    /// malformed names yield an empty list.
    pub fn owned_items(&self, name: &str) -> Result<Vec<OwnershipRecord>, StoreError> {
        let Ok(name) = super::canonical_person_name(name) else {
            return Ok(Vec::new());
        };
        let Some(person) = person_by_name(&self.conn, name.as_str())? else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {OWNERSHIP_COLUMNS} FROM ownership WHERE person_id=?1 ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map(params![person.id], ownership_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
