#![forbid(unsafe_code)]

use thiserror::Error;

/// Kind of record an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Material,
    Sticker,
    Person,
    Category,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material type",
            Self::Sticker => "sticker",
            Self::Person => "person",
            Self::Category => "category",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: Entity, key: String },
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },
    #[error("name conflict: another person is already named {name}")]
    NameConflict { name: String },
    #[error("nothing to remove for {entity} {key}")]
    Empty { entity: Entity, key: String },
    #[error("duplicate owner: sticker {sticker_code} is already assigned to {owner}")]
    DuplicateOwnerViolation { sticker_code: String, owner: String },
}

impl StoreError {
    pub fn already_exists(entity: Entity, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn empty(entity: Entity, key: impl Into<String>) -> Self {
        Self::Empty {
            entity,
            key: key.into(),
        }
    }

    /// Stable identifier for callers that branch on the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NameConflict { .. } => "NAME_CONFLICT",
            Self::Empty { .. } => "EMPTY",
            Self::DuplicateOwnerViolation { .. } => "DUPLICATE_OWNER",
        }
    }
}
