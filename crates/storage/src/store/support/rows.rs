#![forbid(unsafe_code)]

use super::super::{MaterialSummary, MaterialType, OwnershipRecord, Person, StickerUnit};
use rusqlite::Row;

pub(in crate::store) const MATERIAL_COLUMNS: &str =
    "code, name, category, photo, created_at_ms, updated_at_ms";
pub(in crate::store) const MATERIAL_SUMMARY_COLUMNS: &str =
    "code, name, category, CASE WHEN photo IS NULL THEN 0 ELSE 1 END";
pub(in crate::store) const STICKER_COLUMNS: &str =
    "material_code, seq_no, code, name, category, created_at_ms";
pub(in crate::store) const PERSON_COLUMNS: &str = "id, name, floor, branch";
pub(in crate::store) const OWNERSHIP_COLUMNS: &str =
    "id, person_id, sticker_code, name, created_at_ms";

pub(in crate::store) fn material_from_row(row: &Row<'_>) -> rusqlite::Result<MaterialType> {
    Ok(MaterialType {
        code: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        photo: row.get(3)?,
        created_at_ms: row.get(4)?,
        updated_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn material_summary_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<MaterialSummary> {
    Ok(MaterialSummary {
        code: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        has_photo: row.get::<_, i64>(3)? != 0,
    })
}

pub(in crate::store) fn sticker_from_row(row: &Row<'_>) -> rusqlite::Result<StickerUnit> {
    Ok(StickerUnit {
        material_code: row.get(0)?,
        seq_no: row.get(1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        category: row.get(4)?,
        created_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        floor: row.get(2)?,
        branch: row.get(3)?,
    })
}

pub(in crate::store) fn ownership_from_row(row: &Row<'_>) -> rusqlite::Result<OwnershipRecord> {
    Ok(OwnershipRecord {
        id: row.get(0)?,
        person_id: row.get(1)?,
        sticker_code: row.get(2)?,
        name: row.get(3)?,
        created_at_ms: row.get(4)?,
    })
}
