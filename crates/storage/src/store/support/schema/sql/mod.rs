#![forbid(unsafe_code)]

mod catalog;
mod core;
mod custody;
mod directory;
mod indexes;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(catalog::SQL);
    sql.push_str(directory::SQL);
    sql.push_str(custody::SQL);
    sql.push_str(indexes::SQL);
    sql
}
