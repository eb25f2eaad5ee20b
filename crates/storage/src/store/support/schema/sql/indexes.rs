#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_materials_name ON materials(name, code);
        CREATE INDEX IF NOT EXISTS idx_ownership_person ON ownership(person_id, id);
"#;
