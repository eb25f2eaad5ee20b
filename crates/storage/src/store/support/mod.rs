#![forbid(unsafe_code)]

mod lookup_tx;
mod rows;
mod schema;

pub(super) use lookup_tx::*;
pub(super) use rows::*;
pub(super) use schema::migrate_sqlite_schema;
