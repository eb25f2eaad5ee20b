#![forbid(unsafe_code)]

use crate::ids::StockCode;

/// Minimum digit count of the sequence segment.
pub const SEQ_WIDTH: usize = 6;

/// Identity of one physical unit: `{year}_{stock_code}_{seq:06}`.
///
/// The stock code may itself contain `_`; parsing splits at the first and the
/// last separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StickerCode {
    year: i32,
    stock_code: StockCode,
    seq_no: i64,
}

impl StickerCode {
    pub fn derive(year: i32, stock_code: &StockCode, seq_no: i64) -> Self {
        Self {
            year,
            stock_code: stock_code.clone(),
            seq_no,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn stock_code(&self) -> &StockCode {
        &self.stock_code
    }

    pub fn seq_no(&self) -> i64 {
        self.seq_no
    }

    /// Accepts only the exact text `derive` would produce.
    pub fn parse(value: &str) -> Result<Self, StickerCodeError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StickerCodeError::Empty);
        }
        let (year_raw, rest) = value
            .split_once('_')
            .ok_or(StickerCodeError::MissingSeparator)?;
        let (stock_raw, seq_raw) = rest
            .rsplit_once('_')
            .ok_or(StickerCodeError::MissingSeparator)?;

        if year_raw.is_empty() || !year_raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StickerCodeError::InvalidYear);
        }
        let year = year_raw
            .parse::<i32>()
            .map_err(|_| StickerCodeError::InvalidYear)?;

        if seq_raw.len() < SEQ_WIDTH || !seq_raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StickerCodeError::InvalidSequence);
        }
        let seq_no = seq_raw
            .parse::<i64>()
            .map_err(|_| StickerCodeError::InvalidSequence)?;
        if seq_no == 0 {
            return Err(StickerCodeError::InvalidSequence);
        }

        let stock_code =
            StockCode::try_new(stock_raw).map_err(|_| StickerCodeError::InvalidStockCode)?;

        let code = Self {
            year,
            stock_code,
            seq_no,
        };
        if code.to_string() != value {
            return Err(StickerCodeError::NotCanonical);
        }
        Ok(code)
    }
}

impl std::fmt::Display for StickerCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{:0width$}",
            self.year,
            self.stock_code,
            self.seq_no,
            width = SEQ_WIDTH
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StickerCodeError {
    Empty,
    MissingSeparator,
    InvalidYear,
    InvalidStockCode,
    InvalidSequence,
    NotCanonical,
}

impl StickerCodeError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "sticker code must not be empty",
            Self::MissingSeparator => "sticker code must look like YEAR_STOCKCODE_NNNNNN",
            Self::InvalidYear => "sticker code year is invalid",
            Self::InvalidStockCode => "sticker code stock code is invalid",
            Self::InvalidSequence => "sticker code sequence is invalid",
            Self::NotCanonical => "sticker code is not in canonical form",
        }
    }
}
