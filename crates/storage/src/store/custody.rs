#![forbid(unsafe_code)]

//! Custody engine: minting sticker units and moving them between the
//! unassigned pool and people's custody.
//!
//! A unit is either unassigned (no ownership record) or assigned (exactly one
//! record). Custody is never stored on the unit itself; it is discovered
//! through the `ownership` table. Ownership records are not tied to units by a
//! foreign key, so deleting a unit or its material type leaves the record in
//! place. Such dangling records still take part in owner discovery and
//! transfer.

use super::support::{CurrentOwner, current_owner, person_by_name, sticker_unit_name};
use super::{
    AssignRequest, DanglingAssignment, Entity, MintStickersRequest, OwnershipRecord, Person,
    SqliteStore, StoreError, TransferRequest,
};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use sr_core::clock::year_of_ms;
use sr_core::model::{CustodyState, TransferOutcome};
use sr_core::sticker::StickerCode;
use tracing::{debug, info, warn};

/// Largest number of units a single mint may create.
pub const MAX_MINT_BATCH: usize = 1_000_000;

impl SqliteStore {
    /// Mints `count` units numbered from the current highest sequence number
    /// plus one. A freed tail number is therefore reissued by the next mint.
    ///
    /// Runs in an IMMEDIATE transaction so the max-then-insert step holds the
    /// write lock from the start.
    pub fn mint_stickers(
        &mut self,
        request: MintStickersRequest,
    ) -> Result<Vec<StickerCode>, StoreError> {
        let code = super::canonical_stock_code(&request.code)?;
        let year = year_of_ms(request.created_at_ms)
            .filter(|year| *year >= 0)
            .ok_or(StoreError::InvalidInput("created_at_ms is out of range"))?;
        if request.count > MAX_MINT_BATCH {
            return Err(StoreError::InvalidInput("mint count exceeds the batch limit"));
        }
        let count = super::to_sqlite_i64(request.count)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let material = tx
            .query_row(
                "SELECT name, category FROM materials WHERE code=?1",
                params![code.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        let Some((name, category)) = material else {
            return Err(StoreError::not_found(Entity::Material, code.as_str()));
        };

        let last_seq = tx.query_row(
            "SELECT COALESCE(MAX(seq_no), 0) FROM sticker_units WHERE material_code=?1",
            params![code.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        last_seq
            .checked_add(count)
            .ok_or(StoreError::InvalidInput("sticker sequence overflow"))?;

        let mut minted = Vec::with_capacity(request.count);
        {
            let mut insert = tx.prepare(
                "INSERT INTO sticker_units(material_code, seq_no, code, name, category, created_at_ms) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for seq_no in (last_seq + 1)..=(last_seq + count) {
                let sticker = StickerCode::derive(year, &code, seq_no);
                let text = sticker.to_string();
                insert
                    .execute(params![
                        code.as_str(),
                        seq_no,
                        text,
                        name,
                        category,
                        request.created_at_ms
                    ])
                    .map_err(|err| super::map_insert_conflict(err, Entity::Sticker, &text))?;
                minted.push(sticker);
            }
        }
        tx.commit()?;

        info!(
            stock_code = code.as_str(),
            count = minted.len(),
            first_seq = last_seq + 1,
            "stickers minted"
        );
        Ok(minted)
    }

    /// Removes the unit with the highest sequence number, assigned or not.
    /// An ownership record pointing at it is kept and becomes dangling.
    pub fn delete_last_sticker(&mut self, code: &str) -> Result<StickerCode, StoreError> {
        let code = super::canonical_stock_code(code)?;

        let tx = self.conn.transaction()?;
        if !super::support::material_exists(&tx, code.as_str())? {
            return Err(StoreError::not_found(Entity::Material, code.as_str()));
        }
        let last = tx
            .query_row(
                "SELECT seq_no, code FROM sticker_units WHERE material_code=?1 \
                 ORDER BY seq_no DESC LIMIT 1",
                params![code.as_str()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((seq_no, sticker_text)) = last else {
            return Err(StoreError::empty(Entity::Material, code.as_str()));
        };
        let sticker = stored_sticker_code(&sticker_text)?;

        let holder = current_owner(&tx, &sticker_text)?;
        tx.execute(
            "DELETE FROM sticker_units WHERE material_code=?1 AND seq_no=?2",
            params![code.as_str(), seq_no],
        )?;
        tx.commit()?;

        if let Some(holder) = holder {
            warn!(
                sticker_code = sticker_text.as_str(),
                owner = holder.person.name.as_str(),
                "deleted sticker is still assigned; ownership record is now dangling"
            );
        }
        info!(
            stock_code = code.as_str(),
            sticker_code = sticker_text.as_str(),
            "last sticker deleted"
        );
        Ok(sticker)
    }

    /// Puts an unassigned sticker into a person's custody.
    ///
    /// A sticker that already has an owner is rejected with
    /// `DuplicateOwnerViolation`; use `transfer` to move it.
    pub fn assign(&mut self, request: AssignRequest) -> Result<OwnershipRecord, StoreError> {
        let person_name = super::canonical_person_name(&request.person_name)?;
        let sticker = super::canonical_sticker_code(&request.sticker_code)?;
        let sticker_text = sticker.to_string();

        let tx = self.conn.transaction()?;
        let person = person_by_name(&tx, person_name.as_str())?
            .ok_or_else(|| StoreError::not_found(Entity::Person, person_name.as_str()))?;

        if let Some(holder) = current_owner(&tx, &sticker_text)? {
            warn!(
                sticker_code = sticker_text.as_str(),
                owner = holder.person.name.as_str(),
                requested = person.name.as_str(),
                "assign rejected: sticker already has an owner"
            );
            return Err(StoreError::DuplicateOwnerViolation {
                sticker_code: sticker_text,
                owner: holder.person.name,
            });
        }

        let name = match super::optional_text(request.name.as_deref()) {
            Some(name) => name,
            None => sticker_unit_name(&tx, &sticker_text)?
                .ok_or_else(|| StoreError::not_found(Entity::Sticker, sticker_text.as_str()))?,
        };

        let record = insert_ownership(&tx, &person, &sticker_text, &name, request.created_at_ms)?;
        tx.commit()?;

        info!(
            sticker_code = sticker_text.as_str(),
            person = person.name.as_str(),
            "sticker assigned"
        );
        Ok(record)
    }

    /// Single entry point for establishing or moving custody: removes the
    /// sticker from its current holder, if any, and records it under
    /// `new_owner`.
    ///
    /// The denormalized name comes from the sticker unit. When the unit no
    /// longer exists, the name comes from the dangling ownership record. Moving
    /// a sticker onto its current holder re-inserts the record, which makes it
    /// that holder's most recent item.
    pub fn transfer(&mut self, request: TransferRequest) -> Result<TransferOutcome, StoreError> {
        let new_owner = super::canonical_person_name(&request.new_owner)?;
        let sticker = super::canonical_sticker_code(&request.sticker_code)?;
        let sticker_text = sticker.to_string();

        let tx = self.conn.transaction()?;
        let person = person_by_name(&tx, new_owner.as_str())?
            .ok_or_else(|| StoreError::not_found(Entity::Person, new_owner.as_str()))?;

        let unit_name = sticker_unit_name(&tx, &sticker_text)?;
        let holder = current_owner(&tx, &sticker_text)?;
        let name = match (unit_name, &holder) {
            (Some(name), _) => name,
            (None, Some(holder)) => {
                debug!(
                    sticker_code = sticker_text.as_str(),
                    owner = holder.person.name.as_str(),
                    "transferring a dangling ownership record"
                );
                holder.record_name.clone()
            }
            (None, None) => {
                return Err(StoreError::not_found(Entity::Sticker, sticker_text.as_str()));
            }
        };

        if let Some(CurrentOwner { record_id, .. }) = &holder {
            tx.execute("DELETE FROM ownership WHERE id=?1", params![record_id])?;
        }
        insert_ownership(&tx, &person, &sticker_text, &name, request.created_at_ms)?;
        tx.commit()?;

        let outcome = match holder {
            Some(holder) => TransferOutcome::ReassignedFrom {
                previous_owner: holder.person.name,
            },
            None => TransferOutcome::Assigned,
        };
        info!(
            sticker_code = sticker_text.as_str(),
            from = outcome.previous_owner(),
            to = person.name.as_str(),
            outcome = outcome.as_str(),
            "sticker transferred"
        );
        Ok(outcome)
    }

    /// Undoes the most recent assignment onto `person_name`, returning that
    /// sticker to the unassigned pool. The sticker unit itself is untouched.
    pub fn delete_last_owned_item(&mut self, person_name: &str) -> Result<StickerCode, StoreError> {
        let name = super::canonical_person_name(person_name)?;

        let tx = self.conn.transaction()?;
        let person = person_by_name(&tx, name.as_str())?
            .ok_or_else(|| StoreError::not_found(Entity::Person, name.as_str()))?;
        let last = tx
            .query_row(
                "SELECT id, sticker_code FROM ownership WHERE person_id=?1 ORDER BY id DESC LIMIT 1",
                params![person.id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((record_id, sticker_text)) = last else {
            return Err(StoreError::empty(Entity::Person, name.as_str()));
        };
        let sticker = stored_sticker_code(&sticker_text)?;
        tx.execute("DELETE FROM ownership WHERE id=?1", params![record_id])?;
        tx.commit()?;

        info!(
            sticker_code = sticker_text.as_str(),
            person = person.name.as_str(),
            "last owned item released"
        );
        Ok(sticker)
    }

    pub fn find_owner(&self, sticker_code: &str) -> Result<Option<Person>, StoreError> {
        let sticker = super::canonical_sticker_code(sticker_code)?;
        let holder = current_owner(&self.conn, &sticker.to_string())?;
        Ok(holder.map(|holder| holder.person))
    }

    /// `NotFound` when the code has neither a sticker unit nor an ownership record.
    pub fn custody_state(&self, sticker_code: &str) -> Result<CustodyState, StoreError> {
        let sticker = super::canonical_sticker_code(sticker_code)?;
        let sticker_text = sticker.to_string();

        if let Some(holder) = current_owner(&self.conn, &sticker_text)? {
            return Ok(CustodyState::Assigned {
                owner: holder.person.name,
            });
        }
        if sticker_unit_name(&self.conn, &sticker_text)?.is_some() {
            return Ok(CustodyState::Unassigned);
        }
        Err(StoreError::not_found(Entity::Sticker, sticker_text))
    }

    /// Ownership records whose sticker unit no longer exists, ordered by owner
    /// then recency. Read-only.
    pub fn dangling_assignments(&self) -> Result<Vec<DanglingAssignment>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.name, o.sticker_code, o.name, o.created_at_ms
            FROM ownership o
            JOIN people p ON p.id = o.person_id
            WHERE NOT EXISTS (SELECT 1 FROM sticker_units s WHERE s.code = o.sticker_code)
            ORDER BY p.name ASC, o.id DESC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DanglingAssignment {
                owner: row.get(0)?,
                sticker_code: row.get(1)?,
                name: row.get(2)?,
                created_at_ms: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn insert_ownership(
    conn: &Connection,
    person: &Person,
    sticker_code: &str,
    name: &str,
    created_at_ms: i64,
) -> Result<OwnershipRecord, StoreError> {
    conn.execute(
        "INSERT INTO ownership(person_id, sticker_code, name, created_at_ms) VALUES (?1, ?2, ?3, ?4)",
        params![person.id, sticker_code, name, created_at_ms],
    )
    .map_err(|err| super::map_insert_conflict(err, Entity::Sticker, sticker_code))?;

    Ok(OwnershipRecord {
        id: conn.last_insert_rowid(),
        person_id: person.id,
        sticker_code: sticker_code.to_string(),
        name: name.to_string(),
        created_at_ms,
    })
}

fn stored_sticker_code(value: &str) -> Result<StickerCode, StoreError> {
    StickerCode::parse(value)
        .map_err(|_| StoreError::InvalidInput("stored sticker code is malformed"))
}
