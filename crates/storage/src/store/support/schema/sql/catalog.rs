#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS materials (
          code TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          category TEXT,
          photo BLOB,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        -- One row per minted unit. Numbering follows MAX(seq_no), so a deleted
        -- tail number is handed out again by the next mint.
        CREATE TABLE IF NOT EXISTS sticker_units (
          material_code TEXT NOT NULL,
          seq_no INTEGER NOT NULL,
          code TEXT NOT NULL UNIQUE,
          name TEXT NOT NULL,
          category TEXT,
          created_at_ms INTEGER NOT NULL,
          PRIMARY KEY (material_code, seq_no),
          FOREIGN KEY (material_code)
            REFERENCES materials(code)
            ON UPDATE CASCADE
            ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS categories (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL UNIQUE
        );
"#;
