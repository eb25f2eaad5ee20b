#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        -- `id` is the per-record identity counter; "most recent" means highest id.
        -- UNIQUE(sticker_code) is the sticker -> owner index and keeps a unit
        -- in at most one person's custody. There is no foreign key to
        -- sticker_units: records may outlive their unit.
        CREATE TABLE IF NOT EXISTS ownership (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          person_id INTEGER NOT NULL,
          sticker_code TEXT NOT NULL UNIQUE,
          name TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          FOREIGN KEY (person_id)
            REFERENCES people(id)
            ON DELETE CASCADE
        );
"#;
