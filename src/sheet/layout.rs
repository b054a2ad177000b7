use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::sheet::CellAddress;
use crate::utils;

/// The font used for the name in the signature cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignatureFont {
    name: String,
    size: f64,
    #[serde(default)]
    italic: bool,
}

impl SignatureFont {
    #[must_use]
    pub fn new(name: impl Into<String>, size: f64, italic: bool) -> Self {
        Self {
            name: name.into(),
            size,
            italic,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn italic(&self) -> bool {
        self.italic
    }
}

impl Default for SignatureFont {
    fn default() -> Self {
        Self::new("Brush Script MT", 14.0, true)
    }
}

/// Where the values of a [`crate::input::PersonConfig`] go in the template.
///
/// The personal fields and the labor distribution are only written to the
/// first worksheet, the other worksheets reference them through formulas.
/// The signature and the date are written to every worksheet.
///
/// The [`Default`] matches the ESSC labor report timesheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    name: CellAddress,
    a_number: CellAddress,
    position_number: CellAddress,
    title: CellAddress,
    fte: CellAddress,
    department: Option<CellAddress>,
    home_labor: Option<CellAddress>,
    /// First row of the labor distribution block.
    labor_row: u32,
    labor_org_column: String,
    labor_account_column: String,
    labor_percent_column: String,
    signature: CellAddress,
    signature_date: CellAddress,
    signature_font: SignatureFont,
    /// `strftime` like format of the date next to the signature.
    date_format: String,
}

// the addresses are constants, so they will always be in range
const fn cell(column: u32, row: u32) -> CellAddress {
    CellAddress::new_unchecked(column, row)
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            name: cell(5, 6),             // E6
            a_number: cell(10, 6),        // J6
            position_number: cell(15, 6), // O6
            title: cell(18, 6),           // R6
            fte: cell(18, 8),             // R8
            department: None,
            home_labor: None,
            labor_row: 15,
            labor_org_column: "C".to_string(),
            labor_account_column: "D".to_string(),
            labor_percent_column: "E".to_string(),
            signature: cell(5, 30),       // E30
            signature_date: cell(18, 30), // R30
            signature_font: SignatureFont::default(),
            date_format: "%Y.%m.%d".to_string(),
        }
    }
}

impl SheetLayout {
    /// Reads a layout from a toml file, missing keys keep their default.
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        utils::toml_from_reader(File::open(path.as_ref())?)
    }

    pub fn name(&self) -> CellAddress {
        self.name
    }

    pub fn a_number(&self) -> CellAddress {
        self.a_number
    }

    pub fn position_number(&self) -> CellAddress {
        self.position_number
    }

    pub fn title(&self) -> CellAddress {
        self.title
    }

    pub fn fte(&self) -> CellAddress {
        self.fte
    }

    pub fn department(&self) -> Option<CellAddress> {
        self.department
    }

    pub fn home_labor(&self) -> Option<CellAddress> {
        self.home_labor
    }

    pub fn labor_row(&self) -> u32 {
        self.labor_row
    }

    /// The column letters of the org index, account code and percent.
    pub fn labor_columns(&self) -> [&str; 3] {
        [
            self.labor_org_column.as_str(),
            self.labor_account_column.as_str(),
            self.labor_percent_column.as_str(),
        ]
    }

    pub fn signature(&self) -> CellAddress {
        self.signature
    }

    pub fn signature_date(&self) -> CellAddress {
        self.signature_date
    }

    pub fn signature_font(&self) -> &SignatureFont {
        &self.signature_font
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn with_department(mut self, cell: CellAddress) -> Self {
        self.department = Some(cell);
        self
    }

    pub fn with_home_labor(mut self, cell: CellAddress) -> Self {
        self.home_labor = Some(cell);
        self
    }

    pub fn with_labor_row(mut self, row: u32) -> Self {
        self.labor_row = row;
        self
    }

    pub fn with_labor_columns(mut self, org: &str, account: &str, percent: &str) -> Self {
        self.labor_org_column = org.to_string();
        self.labor_account_column = account.to_string();
        self.labor_percent_column = percent.to_string();
        self
    }
}
