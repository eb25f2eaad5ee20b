#![forbid(unsafe_code)]

mod catalog;
mod categories;
mod config;
mod custody;
mod directory;
mod error;
mod photo;
mod query;
mod requests;
mod support;
mod types;

pub use config::{FAST_PRAGMAS_ENV, STORAGE_DIR_ENV, StoreConfig};
pub use custody::MAX_MINT_BATCH;
pub use error::{Entity, StoreError};
pub use photo::read_photo_file;
pub use requests::*;
pub use types::*;

use rusqlite::{Connection, ErrorCode};
use sr_core::ids::{PersonName, StockCode};
use sr_core::sticker::StickerCode;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DB_FILE_NAME: &str = "stockroom.db";
const DB_SIDECAR_SUFFIXES: &[&str] = &["-journal", "-wal", "-shm"];

/// Handle to the persistent store. Every public operation scopes its own
/// transaction; mutations take `&mut self`, so one handle is one writer.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(StoreConfig::new(storage_dir))
    }

    pub fn open_with(config: StoreConfig) -> Result<Self, StoreError> {
        let storage_dir = config.storage_dir;
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(config.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if config.fast_pragmas {
            conn.execute_batch(
                "PRAGMA synchronous = OFF; PRAGMA journal_mode = MEMORY; PRAGMA temp_store = MEMORY;",
            )?;
        }

        support::migrate_sqlite_schema(&conn)?;
        debug!(
            path = %db_path.display(),
            fast_pragmas = config.fast_pragmas,
            "store opened"
        );

        Ok(Self { conn, storage_dir })
    }

    /// Removes the database file (and SQLite sidecar files) under `storage_dir`.
    /// Other files in the directory are left alone.
    pub fn destroy(storage_dir: impl AsRef<Path>) -> Result<(), StoreError> {
        let db_path = storage_dir.as_ref().join(DB_FILE_NAME);
        remove_if_exists(&db_path)?;
        for suffix in DB_SIDECAR_SUFFIXES {
            let mut sidecar = db_path.clone().into_os_string();
            sidecar.push(suffix);
            remove_if_exists(Path::new(&sidecar))?;
        }
        info!(path = %db_path.display(), "store destroyed");
        Ok(())
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(DB_FILE_NAME)
    }

    /// Allocated database size (`page_count * page_size`).
    pub fn db_size_bytes(&self) -> Result<u64, StoreError> {
        let bytes = self.conn.query_row(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(u64::try_from(bytes).unwrap_or(0))
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn map_insert_conflict(err: rusqlite::Error, entity: Entity, key: &str) -> StoreError {
    if is_constraint_violation(&err) {
        return StoreError::already_exists(entity, key);
    }
    StoreError::Sql(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}

fn canonical_stock_code(value: &str) -> Result<StockCode, StoreError> {
    StockCode::try_new(value).map_err(|err| StoreError::InvalidInput(err.message()))
}

fn canonical_person_name(value: &str) -> Result<PersonName, StoreError> {
    PersonName::try_new(value).map_err(|err| StoreError::InvalidInput(err.message()))
}

fn canonical_sticker_code(value: &str) -> Result<StickerCode, StoreError> {
    StickerCode::parse(value).map_err(|err| StoreError::InvalidInput(err.message()))
}

fn required_text(value: &str, message: &'static str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(message));
    }
    Ok(trimmed.to_string())
}

/// Trimmed text, or `None` when blank.
fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
