use derive_more::Display;

use crate::export::ExportError;

/// The biweekly pay period of a worksheet, e.g. `1` for a sheet named `2026-01`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0}")]
pub struct Period(u32);

impl Period {
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self(period)
    }

    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Reads the period from the segment after the first `-` of a sheet name.
    pub fn from_sheet_name(name: &str) -> Result<Self, ExportError> {
        name.split('-')
            .nth(1)
            .and_then(|segment| segment.trim().parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| ExportError::InvalidSheetName(name.to_string()))
    }
}

/// The name of the pdf for a period, like `Smith 12-26.pdf`.
#[must_use]
pub fn pdf_file_name(surname: &str, period: Period, year: &str) -> String {
    format!("{} {}-{}.pdf", surname, period, year)
}
