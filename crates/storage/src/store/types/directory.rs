#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub floor: Option<i64>,
    pub branch: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub id: i64,
    pub person_id: i64,
    pub sticker_code: String,
    pub name: String,
    pub created_at_ms: i64,
}

/// Ownership record whose sticker unit no longer exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingAssignment {
    pub owner: String,
    pub sticker_code: String,
    pub name: String,
    pub created_at_ms: i64,
}
