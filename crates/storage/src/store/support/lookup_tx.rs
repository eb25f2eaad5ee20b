#![forbid(unsafe_code)]

use super::super::{MaterialType, Person, StoreError};
use super::rows::{MATERIAL_COLUMNS, PERSON_COLUMNS, material_from_row, person_from_row};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

/// Holder of a sticker as found by owner discovery.
#[derive(Clone, Debug)]
pub(in crate::store) struct CurrentOwner {
    pub(in crate::store) record_id: i64,
    pub(in crate::store) record_name: String,
    pub(in crate::store) person: Person,
}

pub(in crate::store) fn material_exists(conn: &Connection, code: &str) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM materials WHERE code=?1",
            params![code],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

pub(in crate::store) fn material_by_code(
    conn: &Connection,
    code: &str,
) -> Result<Option<MaterialType>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE code=?1"),
            params![code],
            material_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn person_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Person>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE name=?1"),
            params![name],
            person_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn person_by_id(conn: &Connection, id: i64) -> Result<Option<Person>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id=?1"),
            params![id],
            person_from_row,
        )
        .optional()?)
}

/// Denormalized material name stored on the sticker unit, if the unit exists.
pub(in crate::store) fn sticker_unit_name(
    conn: &Connection,
    sticker_code: &str,
) -> Result<Option<String>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT name FROM sticker_units WHERE code=?1",
            params![sticker_code],
            |row| row.get::<_, String>(0),
        )
        .optional()?)
}

/// Owner discovery. People are visited alphabetically and the first match wins.
pub(in crate::store) fn current_owner(
    conn: &Connection,
    sticker_code: &str,
) -> Result<Option<CurrentOwner>, StoreError> {
    let found = conn
        .query_row(
            r#"
            SELECT o.id, o.name, p.id, p.name, p.floor, p.branch
            FROM ownership o
            JOIN people p ON p.id = o.person_id
            WHERE o.sticker_code=?1
            ORDER BY p.name ASC
            LIMIT 1
            "#,
            params![sticker_code],
            |row| {
                Ok(CurrentOwner {
                    record_id: row.get(0)?,
                    record_name: row.get(1)?,
                    person: Person {
                        id: row.get(2)?,
                        name: row.get(3)?,
                        floor: row.get(4)?,
                        branch: row.get(5)?,
                    },
                })
            },
        )
        .optional()?;
    debug!(
        sticker_code,
        owner = found.as_ref().map(|holder| holder.person.name.as_str()),
        "owner discovery"
    );
    Ok(found)
}
