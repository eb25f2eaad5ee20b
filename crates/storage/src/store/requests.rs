#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterMaterialRequest {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PhotoUpdate {
    #[default]
    Keep,
    Set(Vec<u8>),
    Clear,
}

/// `None` fields stay as they are. `category: Some("")` clears the category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateMaterialRequest {
    pub code: String,
    pub new_code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub photo: PhotoUpdate,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintStickersRequest {
    pub code: String,
    pub count: usize,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddPersonRequest {
    pub name: String,
    pub floor: Option<i64>,
    pub branch: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdatePersonRequest {
    pub id: i64,
    pub name: Option<String>,
    pub floor: Option<i64>,
    pub branch: Option<String>,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignRequest {
    pub person_name: String,
    pub sticker_code: String,
    /// Denormalized material name; taken from the sticker unit when `None`.
    pub name: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub sticker_code: String,
    pub new_owner: String,
    pub created_at_ms: i64,
}
