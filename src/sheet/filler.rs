use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info, trace};
use thiserror::Error;
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

use crate::input::PersonConfig;
use crate::sheet::{CellAddress, InvalidCell, SheetLayout};
use crate::utils;

#[derive(Debug, Error)]
pub enum FillError {
    #[error("failed to open template `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: reader::xlsx::XlsxError,
    },
    #[error("failed to save workbook to `{}`", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: writer::xlsx::XlsxError,
    },
    #[error("failed to create the directory for `{}`", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("refusing to overwrite the template `{}`", path.display())]
    SameAsTemplate { path: PathBuf },
    #[error("template does not contain a single worksheet")]
    NoWorksheets,
    #[error("invalid cell in layout: {0}")]
    Cell(#[from] InvalidCell),
    #[error("invalid date format `{0}`")]
    DateFormat(String),
}

/// The value written to the percent column of a labor row.
#[derive(Debug, Clone, PartialEq)]
pub enum PercentValue {
    Number(f64),
    Text(String),
}

impl PercentValue {
    /// Reads `"50"`, `"12.5"` or `".5"` as a number, anything else is kept as text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(text.to_string()),
        }
    }

    fn write_to(&self, sheet: &mut Worksheet, cell: CellAddress) {
        let cell = sheet.get_cell_mut(cell.coordinate());
        match self {
            Self::Number(number) => cell.set_value_number(*number),
            Self::Text(text) => cell.set_value_string(text.as_str()),
        };
    }
}

fn write_text(sheet: &mut Worksheet, cell: CellAddress, value: &str) {
    trace!("{}!{} = {:?}", sheet.get_name(), cell, value);
    sheet.get_cell_mut(cell.coordinate()).set_value_string(value);
}

fn format_date(date: NaiveDate, format: &str) -> Result<String, FillError> {
    let mut result = String::new();
    write!(result, "{}", date.format(format))
        .map_err(|_| FillError::DateFormat(format.to_string()))?;

    Ok(result)
}

/// Writes the person data into the first worksheet and the signature into all of them.
pub fn fill_workbook(
    book: &mut Spreadsheet,
    config: &PersonConfig,
    layout: &SheetLayout,
    date: NaiveDate,
) -> Result<(), FillError> {
    let date = format_date(date, layout.date_format())?;
    let sheet_count = book.get_sheet_count();

    let primary = book.get_sheet_mut(&0).ok_or(FillError::NoWorksheets)?;
    debug!("filling personal info into `{}`", primary.get_name());

    write_text(primary, layout.name(), config.name());
    write_text(primary, layout.a_number(), config.a_number());
    write_text(primary, layout.position_number(), config.position_number());
    write_text(primary, layout.title(), config.title());
    write_text(primary, layout.fte(), config.fte());

    if let Some(cell) = layout.department() {
        write_text(primary, cell, config.department());
    }

    if let Some(cell) = layout.home_labor() {
        write_text(primary, cell, config.home_labor());
    }

    // NOTE: the template only has room for a few rows, more entries will
    //       overwrite whatever follows the labor distribution
    let [org_column, account_column, percent_column] = layout.labor_columns();
    for (i, labor) in config.labor().iter().enumerate() {
        let row = u64::from(layout.labor_row()) + i as u64;

        write_text(
            primary,
            CellAddress::from_column(org_column, row)?,
            labor.org_index(),
        );
        write_text(
            primary,
            CellAddress::from_column(account_column, row)?,
            labor.account_code(),
        );
        PercentValue::parse(labor.percent())
            .write_to(primary, CellAddress::from_column(percent_column, row)?);
    }

    let font = layout.signature_font();
    for index in 0..sheet_count {
        let Some(sheet) = book.get_sheet_mut(&index) else {
            continue;
        };
        trace!("signing `{}`", sheet.get_name());

        let signature = sheet.get_cell_mut(layout.signature().coordinate());
        signature.set_value_string(config.name());
        signature
            .get_style_mut()
            .get_font_mut()
            .set_name(font.name())
            .set_size(font.size())
            .set_italic(font.italic());

        write_text(sheet, layout.signature_date(), &date);
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Fills the template with the data of `config` and saves it to `output`.
///
/// The date next to the signature is today.
pub fn fill_timesheet(
    template: impl AsRef<Path>,
    config: &PersonConfig,
    layout: &SheetLayout,
    output: impl AsRef<Path>,
) -> Result<PathBuf, FillError> {
    fill_timesheet_on(template, config, layout, output, Local::now().date_naive())
}

/// Like [`fill_timesheet`], but signs with the given `date`.
pub fn fill_timesheet_on(
    template: impl AsRef<Path>,
    config: &PersonConfig,
    layout: &SheetLayout,
    output: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, FillError> {
    let template = template.as_ref();
    let output = output.as_ref();

    if is_same_file(template, output) {
        return Err(FillError::SameAsTemplate {
            path: template.to_path_buf(),
        });
    }

    info!("reading template `{}`", template.display());
    let mut book =
        umya_spreadsheet::reader::xlsx::read(template).map_err(|source| FillError::Open {
            path: template.to_path_buf(),
            source,
        })?;

    if book.get_sheet_count() == 0 {
        return Err(FillError::NoWorksheets);
    }

    fill_workbook(&mut book, config, layout, date)?;

    utils::create_parent_dir(output).map_err(|source| FillError::CreateDir {
        path: output.to_path_buf(),
        source,
    })?;

    umya_spreadsheet::writer::xlsx::write(&book, output).map_err(|source| FillError::Save {
        path: output.to_path_buf(),
        source,
    })?;
    info!("saved filled workbook to `{}`", output.display());

    Ok(output.to_path_buf())
}
