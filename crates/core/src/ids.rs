#![forbid(unsafe_code)]

const MAX_STOCK_CODE_LEN: usize = 64;
const MAX_PERSON_NAME_LEN: usize = 256;

/// Catalog key of a material type (e.g. `IT0001`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockCode(String);

impl StockCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Trims surrounding whitespace, then validates.
    pub fn try_new(value: impl Into<String>) -> Result<Self, StockCodeError> {
        let value = value.into();
        let trimmed = value.trim();
        validate_stock_code(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for StockCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StockCodeError {
    Empty,
    TooLong,
    ContainsWhitespace,
    ContainsControl,
}

impl StockCodeError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "stock code must not be empty",
            Self::TooLong => "stock code is too long",
            Self::ContainsWhitespace => "stock code must not contain whitespace",
            Self::ContainsControl => "stock code contains control characters",
        }
    }
}

fn validate_stock_code(value: &str) -> Result<(), StockCodeError> {
    if value.is_empty() {
        return Err(StockCodeError::Empty);
    }
    if value.len() > MAX_STOCK_CODE_LEN {
        return Err(StockCodeError::TooLong);
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(StockCodeError::ContainsControl);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(StockCodeError::ContainsWhitespace);
    }
    Ok(())
}

/// Unique display name of a person in the directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonName(String);

impl PersonName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, PersonNameError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PersonNameError::Empty);
        }
        if trimmed.len() > MAX_PERSON_NAME_LEN {
            return Err(PersonNameError::TooLong);
        }
        if trimmed.chars().any(|c| c.is_control()) {
            return Err(PersonNameError::ContainsControl);
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersonNameError {
    Empty,
    TooLong,
    ContainsControl,
}

impl PersonNameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "person name must not be empty",
            Self::TooLong => "person name is too long",
            Self::ContainsControl => "person name contains control characters",
        }
    }
}
