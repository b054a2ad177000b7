//! Turning every worksheet of the filled workbook into its own pdf.
//!
//! There are two ways to do this, which one is used depends on what is
//! installed on the host:
//!
//! - [`ExcelExporter`] drives Microsoft Excel through AppleScript, prints the
//!   whole workbook into one pdf and splits it into single pages.
//! - [`LibreOfficeExporter`] converts one single-sheet copy of the workbook
//!   per worksheet with a headless `soffice`.

mod excel;
mod libre_office;
mod period;
mod process;
mod settings;
mod split;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use thiserror::Error;
use umya_spreadsheet::{reader, writer};

use crate::utils;

pub use excel::*;
pub use libre_office::*;
pub use period::*;
pub use process::*;
pub use settings::*;
pub use split::*;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(
        "No PDF export method available, looked for `{}` and a `soffice` converter.\n\
         Please install either:\n  \
         - Microsoft Excel (preferred)\n  \
         - LibreOffice: brew install --cask libreoffice (macOS) or your package manager",
        excel_app.display()
    )]
    Unavailable { excel_app: PathBuf },
    #[error("worksheet `{0}` has no period after a `-`, like `2026-01`")]
    InvalidSheetName(String),
    #[error("failed to read workbook `{}`", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: reader::xlsx::XlsxError,
    },
    #[error("failed to write single sheet workbook `{}`", path.display())]
    SheetCopy {
        path: PathBuf,
        #[source]
        source: writer::xlsx::XlsxError,
    },
    #[error("failed to remove worksheet `{sheet}` from the copy: {reason}")]
    RemoveSheet { sheet: String, reason: String },
    #[error("excel automation failed with status {status:?}: {stderr}")]
    Automation { status: Option<i32>, stderr: String },
    #[error("excel did not export the workbook within {0:?}")]
    Timeout(Duration),
    #[error("expected `{}` to be created", path.display())]
    MissingOutput { path: PathBuf },
    #[error("failed to convert worksheet `{sheet}`, status: {status:?}, stderr: {stderr}")]
    Conversion {
        sheet: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("the exported pdf has {pages} pages, but the workbook has {sheets} worksheets")]
    PageCount { pages: usize, sheets: usize },
    #[error("exported {actual} pdfs for {expected} worksheets")]
    Incomplete { expected: usize, actual: usize },
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One worksheet and the pdf it will be exported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    name: String,
    period: Period,
    output: PathBuf,
}

impl SheetTarget {
    pub fn new(
        name: impl Into<String>,
        output_dir: &Path,
        surname: &str,
        year: &str,
    ) -> Result<Self, ExportError> {
        let name = name.into();
        let period = Period::from_sheet_name(&name)?;
        let output = output_dir.join(pdf_file_name(surname, period, year));

        Ok(Self {
            name,
            period,
            output,
        })
    }

    /// The name of the worksheet in the workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Everything an exporter needs to know about one export.
#[derive(Debug, Clone)]
pub struct ExportJob {
    workbook: PathBuf,
    output_dir: PathBuf,
    sheets: Vec<SheetTarget>,
}

impl ExportJob {
    pub fn new(workbook: PathBuf, output_dir: PathBuf, sheets: Vec<SheetTarget>) -> Self {
        Self {
            workbook,
            output_dir,
            sheets,
        }
    }

    pub fn workbook(&self) -> &Path {
        &self.workbook
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The worksheets in workbook order.
    pub fn sheets(&self) -> &[SheetTarget] {
        &self.sheets
    }
}

/// Something that can make one pdf per worksheet of a workbook.
pub trait PdfExporter {
    /// A short name for the log.
    fn name(&self) -> &str;

    /// Creates the pdf of every sheet in `job` and returns their paths in worksheet order.
    ///
    /// Either all pdfs are created or an error is returned.
    fn export(&self, job: &ExportJob) -> Result<Vec<PathBuf>, ExportError>;
}

/// Picks the first exporter whose program is installed, Excel before LibreOffice.
pub fn detect_exporter(settings: &ExportSettings) -> Result<Box<dyn PdfExporter>, ExportError> {
    if !settings.is_converter_preferred() && settings.excel_app_path().exists() {
        return Ok(Box::new(ExcelExporter::new(
            settings.osascript_path(),
            settings.excel_timeout_duration(),
        )));
    }

    if let Some(soffice) = settings.find_converter() {
        let mut exporter = LibreOfficeExporter::new(soffice);
        if let Some(dir) = settings.preserve_dir_path() {
            exporter.preserve_dir(dir);
        }

        return Ok(Box::new(exporter));
    }

    Err(ExportError::Unavailable {
        excel_app: settings.excel_app_path().to_path_buf(),
    })
}

/// The names of all worksheets in workbook order.
pub fn sheet_names(workbook: &Path) -> Result<Vec<String>, ExportError> {
    let book =
        umya_spreadsheet::reader::xlsx::read(workbook).map_err(|source| ExportError::Workbook {
            path: workbook.to_path_buf(),
            source,
        })?;

    Ok((0..book.get_sheet_count())
        .filter_map(|index| book.get_sheet(&index))
        .map(|sheet| sheet.get_name().to_string())
        .collect())
}

/// Exports each worksheet of `workbook` to `"{surname} {period}-{year}.pdf"` in `output_dir`.
///
/// Existing pdfs with the same name are overwritten.
pub fn export_sheets_to_pdf(
    workbook: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    surname: &str,
    year: &str,
    settings: &ExportSettings,
) -> Result<Vec<PathBuf>, ExportError> {
    utils::create_dir_all(output_dir.as_ref())?;
    let workbook = dunce::canonicalize(workbook.as_ref())?;
    let output_dir = dunce::canonicalize(output_dir.as_ref())?;

    let exporter = detect_exporter(settings)?;
    info!("exporting with {}", exporter.name());

    let sheets = sheet_names(&workbook)?
        .into_iter()
        .map(|name| SheetTarget::new(name, &output_dir, surname, year))
        .collect::<Result<Vec<_>, _>>()?;

    let job = ExportJob::new(workbook, output_dir, sheets);
    let paths = exporter.export(&job)?;

    if paths.len() != job.sheets().len() {
        return Err(ExportError::Incomplete {
            expected: job.sheets().len(),
            actual: paths.len(),
        });
    }

    Ok(paths)
}
