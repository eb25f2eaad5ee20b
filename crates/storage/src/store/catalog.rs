#![forbid(unsafe_code)]

use super::support::{
    MATERIAL_SUMMARY_COLUMNS, STICKER_COLUMNS, material_by_code, material_exists,
    material_summary_from_row, sticker_from_row,
};
use super::{
    Entity, MaterialSummary, MaterialType, PhotoUpdate, RegisterMaterialRequest, SqliteStore,
    StickerUnit, StoreError, UpdateMaterialRequest,
};
use rusqlite::{OptionalExtension, params};
use tracing::{info, warn};

impl SqliteStore {
    /// Adds a catalog entry. Its sticker sequence starts out empty.
    pub fn register_material(
        &mut self,
        request: RegisterMaterialRequest,
    ) -> Result<MaterialType, StoreError> {
        let code = super::canonical_stock_code(&request.code)?;
        let name = super::required_text(&request.name, "material name must not be empty")?;
        let category = super::optional_text(request.category.as_deref());

        let tx = self.conn.transaction()?;
        if material_exists(&tx, code.as_str())? {
            warn!(stock_code = code.as_str(), "material type already registered");
            return Err(StoreError::already_exists(Entity::Material, code.as_str()));
        }

        tx.execute(
            "INSERT INTO materials(code, name, category, photo, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                code.as_str(),
                name,
                category,
                request.photo,
                request.created_at_ms
            ],
        )
        .map_err(|err| super::map_insert_conflict(err, Entity::Material, code.as_str()))?;

        tx.commit()?;
        info!(
            stock_code = code.as_str(),
            name = %name,
            has_photo = request.photo.is_some(),
            "material type registered"
        );

        Ok(MaterialType {
            code: code.into_string(),
            name,
            category,
            photo: request.photo,
            created_at_ms: request.created_at_ms,
            updated_at_ms: request.created_at_ms,
        })
    }

    /// Changes any subset of code, name, category and photo in one transaction.
    ///
    /// A code change moves the whole sticker sequence to the new code; sticker
    /// codes already issued keep their original text. A name or category change
    /// is copied onto every sticker unit of the type.
    pub fn update_material(
        &mut self,
        request: UpdateMaterialRequest,
    ) -> Result<MaterialType, StoreError> {
        let code = super::canonical_stock_code(&request.code)?;
        let new_code = request
            .new_code
            .as_deref()
            .map(super::canonical_stock_code)
            .transpose()?;
        let name = request
            .name
            .as_deref()
            .map(|value| super::required_text(value, "material name must not be empty"))
            .transpose()?;
        let category = request.category.as_deref().map(str::trim);

        if new_code.is_none()
            && name.is_none()
            && category.is_none()
            && request.photo == PhotoUpdate::Keep
        {
            return Err(StoreError::InvalidInput("nothing to update"));
        }

        let tx = self.conn.transaction()?;
        if !material_exists(&tx, code.as_str())? {
            return Err(StoreError::not_found(Entity::Material, code.as_str()));
        }

        let renamed_to = new_code.as_ref().filter(|target| **target != code);
        if let Some(target) = renamed_to {
            if material_exists(&tx, target.as_str())? {
                warn!(
                    stock_code = code.as_str(),
                    new_code = target.as_str(),
                    "rename target already registered"
                );
                return Err(StoreError::already_exists(Entity::Material, target.as_str()));
            }
            // sticker_units follow through ON UPDATE CASCADE
            tx.execute(
                "UPDATE materials SET code=?2 WHERE code=?1",
                params![code.as_str(), target.as_str()],
            )
            .map_err(|err| super::map_insert_conflict(err, Entity::Material, target.as_str()))?;
        }
        let current = renamed_to.unwrap_or(&code);

        if let Some(name) = &name {
            tx.execute(
                "UPDATE materials SET name=?2 WHERE code=?1",
                params![current.as_str(), name],
            )?;
        }
        if let Some(category) = category {
            let category = (!category.is_empty()).then_some(category);
            tx.execute(
                "UPDATE materials SET category=?2 WHERE code=?1",
                params![current.as_str(), category],
            )?;
        }
        let propagated = if name.is_some() || category.is_some() {
            tx.execute(
                "UPDATE sticker_units \
                 SET name=(SELECT name FROM materials WHERE code=?1), \
                     category=(SELECT category FROM materials WHERE code=?1) \
                 WHERE material_code=?1",
                params![current.as_str()],
            )?
        } else {
            0
        };
        match &request.photo {
            PhotoUpdate::Keep => {}
            PhotoUpdate::Set(bytes) => {
                tx.execute(
                    "UPDATE materials SET photo=?2 WHERE code=?1",
                    params![current.as_str(), bytes],
                )?;
            }
            PhotoUpdate::Clear => {
                tx.execute(
                    "UPDATE materials SET photo=NULL WHERE code=?1",
                    params![current.as_str()],
                )?;
            }
        }
        tx.execute(
            "UPDATE materials SET updated_at_ms=MAX(updated_at_ms, ?2) WHERE code=?1",
            params![current.as_str(), request.updated_at_ms],
        )?;

        let updated = material_by_code(&tx, current.as_str())?
            .ok_or_else(|| StoreError::not_found(Entity::Material, current.as_str()))?;
        tx.commit()?;

        info!(
            stock_code = code.as_str(),
            new_code = renamed_to.map(|c| c.as_str()),
            stickers_updated = propagated,
            "material type updated"
        );
        Ok(updated)
    }

    /// Deletes the type and its sticker sequence. Ownership records of those
    /// stickers are left in place and become dangling.
    ///
    /// Returns the number of sticker units removed.
    pub fn delete_material(&mut self, code: &str) -> Result<usize, StoreError> {
        let code = super::canonical_stock_code(code)?;

        let tx = self.conn.transaction()?;
        if !material_exists(&tx, code.as_str())? {
            return Err(StoreError::not_found(Entity::Material, code.as_str()));
        }
        let removed = tx.execute(
            "DELETE FROM sticker_units WHERE material_code=?1",
            params![code.as_str()],
        )?;
        tx.execute(
            "DELETE FROM materials WHERE code=?1",
            params![code.as_str()],
        )?;
        tx.commit()?;

        info!(
            stock_code = code.as_str(),
            stickers_removed = removed,
            "material type deleted"
        );
        Ok(removed)
    }

    pub fn list_materials(&self) -> Result<Vec<MaterialSummary>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MATERIAL_SUMMARY_COLUMNS} FROM materials ORDER BY name ASC, code ASC"
        ))?;
        let rows = stmt.query_map([], material_summary_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn material_get(&self, code: &str) -> Result<Option<MaterialType>, StoreError> {
        let code = super::canonical_stock_code(code)?;
        material_by_code(&self.conn, code.as_str())
    }

    /// Photo bytes of a type; `Ok(None)` when the type has no photo.
    pub fn material_photo(&self, code: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let code = super::canonical_stock_code(code)?;
        let photo = self
            .conn
            .query_row(
                "SELECT photo FROM materials WHERE code=?1",
                params![code.as_str()],
                |row| row.get::<_, Option<Vec<u8>>>(0),
            )
            .optional()?;
        match photo {
            Some(photo) => Ok(photo),
            None => Err(StoreError::not_found(Entity::Material, code.as_str())),
        }
    }

    /// Sticker units of one type, newest (highest sequence number) first.
    pub fn list_stickers(&self, code: &str) -> Result<Vec<StickerUnit>, StoreError> {
        let code = super::canonical_stock_code(code)?;
        if !material_exists(&self.conn, code.as_str())? {
            return Err(StoreError::not_found(Entity::Material, code.as_str()));
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STICKER_COLUMNS} FROM sticker_units WHERE material_code=?1 ORDER BY seq_no DESC"
        ))?;
        let rows = stmt.query_map(params![code.as_str()], sticker_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
