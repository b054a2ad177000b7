use std::str::FromStr;

use derive_more::Display;
use serde::{de, Deserialize};
use thiserror::Error;

/// The largest column index of an `.xlsx` worksheet (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// The largest row index of an `.xlsx` worksheet.
pub const MAX_ROW: u32 = 1_048_576;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidCell {
    #[error("`{0}` is not a cell reference like `E6`")]
    Syntax(String),
    #[error("column `{0}` is past the last column `XFD`")]
    ColumnOutOfRange(String),
    #[error("row {0} is outside of 1..=1048576")]
    RowOutOfRange(u64),
}

/// A single cell reference in A1 notation, 1-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
#[display("{}{}", column_name(*column), row)]
pub struct CellAddress {
    column: u32,
    row: u32,
}

/// Converts a 1-based column index to its letters, e.g. `3` to `C`.
#[must_use]
pub fn column_name(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(b'A' + remainder as u8);
        column = (column - 1) / 26;
    }

    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Converts column letters to a 1-based index, e.g. `AA` to `27`.
pub fn column_index(letters: &str) -> Result<u32, InvalidCell> {
    let letters = letters.trim_start_matches('$');
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(InvalidCell::Syntax(letters.to_string()));
    }

    let mut index: u64 = 0;
    for byte in letters.bytes() {
        index = index * 26 + u64::from(byte.to_ascii_uppercase() - b'A' + 1);
        if index > u64::from(MAX_COLUMN) {
            return Err(InvalidCell::ColumnOutOfRange(letters.to_ascii_uppercase()));
        }
    }

    Ok(index as u32)
}

fn check_row(row: u64) -> Result<u32, InvalidCell> {
    if row == 0 || row > u64::from(MAX_ROW) {
        return Err(InvalidCell::RowOutOfRange(row));
    }

    Ok(row as u32)
}

impl CellAddress {
    pub fn new(column: u32, row: u32) -> Result<Self, InvalidCell> {
        if column == 0 || column > MAX_COLUMN {
            return Err(InvalidCell::ColumnOutOfRange(column_name(column)));
        }

        Ok(Self {
            column,
            row: check_row(u64::from(row))?,
        })
    }

    /// Callers must make sure that the column and row are in range.
    pub(crate) const fn new_unchecked(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Builds the address of `row` in the column named by `letters`.
    pub fn from_column(letters: &str, row: u64) -> Result<Self, InvalidCell> {
        Ok(Self {
            column: column_index(letters)?,
            row: check_row(row)?,
        })
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// The `(column, row)` pair expected by `umya_spreadsheet`.
    #[must_use]
    pub fn coordinate(&self) -> (u32, u32) {
        (self.column, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = InvalidCell;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let trimmed = string.trim().trim_start_matches('$');
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(|| InvalidCell::Syntax(string.to_string()))?;

        let (letters, digits) = trimmed.split_at(split);
        let digits = digits.strip_prefix('$').unwrap_or(digits);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(InvalidCell::Syntax(string.to_string()));
        }

        // more digits than fit into an u64 are certainly out of range
        let row = digits.parse::<u64>().unwrap_or(u64::MAX);

        Self::from_column(letters, row)
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}
