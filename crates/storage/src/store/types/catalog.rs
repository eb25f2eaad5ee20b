#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialType {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Listing row; carries a presence flag instead of the photo bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialSummary {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub has_photo: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickerUnit {
    pub material_code: String,
    pub seq_no: i64,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
