//! Fills the ESSC biweekly labor report timesheet with the data of one person
//! and exports every worksheet as its own pdf.

mod utils;

pub mod export;
pub mod input;
pub mod sheet;

use std::path::{Path, PathBuf};

use log::info;

pub use crate::export::{export_sheets_to_pdf, ExportError, ExportSettings};
pub use crate::input::{load_config, ConfigError, LaborEntry, PersonConfig};
pub use crate::sheet::{fill_timesheet, FillError, SheetLayout};

/// The name of the filled workbook inside the output directory.
pub const FILLED_WORKBOOK: &str = "filled_timesheet.xlsx";

/// The paths created by [`generate_timesheets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub workbook: PathBuf,
    pub pdfs: Vec<PathBuf>,
}

/// Fills `template` into `output_dir` and exports all of its worksheets as pdfs.
pub fn generate_timesheets(
    template: impl AsRef<Path>,
    config: &PersonConfig,
    layout: &SheetLayout,
    output_dir: impl AsRef<Path>,
    year: &str,
    settings: &ExportSettings,
) -> anyhow::Result<Generated> {
    let output_dir = output_dir.as_ref();
    let workbook = fill_timesheet(template, config, layout, output_dir.join(FILLED_WORKBOOK))?;

    info!("exporting sheets to pdf");
    let pdfs = export_sheets_to_pdf(&workbook, output_dir, config.last_name(), year, settings)?;

    Ok(Generated { workbook, pdfs })
}
