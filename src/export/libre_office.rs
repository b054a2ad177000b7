use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, error, info};
use tempfile::TempDir;
use umya_spreadsheet::Spreadsheet;

use crate::export::{ExportError, ExportJob, PdfExporter, SheetTarget};
use crate::utils;

/// Exports through a headless LibreOffice, one worksheet at a time.
pub struct LibreOfficeExporter {
    /// Path to `soffice`.
    soffice: PathBuf,
    preserve_dir: Option<PathBuf>,
}

/// A copy of `book` that only contains the worksheet named `keep`.
fn single_sheet_copy(book: &Spreadsheet, keep: &str) -> Result<Spreadsheet, ExportError> {
    let mut copy = book.clone();

    let others = (0..copy.get_sheet_count())
        .filter_map(|index| copy.get_sheet(&index))
        .map(|sheet| sheet.get_name().to_string())
        .filter(|name| name != keep)
        .collect::<Vec<_>>();

    for name in others {
        copy.remove_sheet_by_name(&name)
            .map_err(|reason| ExportError::RemoveSheet {
                sheet: name.clone(),
                reason: reason.to_string(),
            })?;
    }

    // the active tab of the original might point past the only sheet left
    copy.get_workbook_view_mut().set_active_tab(0);

    Ok(copy)
}

impl LibreOfficeExporter {
    pub fn new(soffice: impl Into<PathBuf>) -> Self {
        Self {
            soffice: soffice.into(),
            preserve_dir: None,
        }
    }

    pub fn preserve_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.preserve_dir = Some(path.into());
        self
    }

    fn convert(&self, input: &Path, outdir: &Path) -> Result<Output, ExportError> {
        let mut cmd = Command::new(&self.soffice);
        cmd.args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(outdir)
            .arg(input);

        debug!("running {:?}", cmd);
        Ok(cmd.output()?)
    }

    /// Copies the working directory somewhere it survives, for debugging a failed conversion.
    fn preserve(&self, working_dir: &TempDir) {
        let Some(path) = &self.preserve_dir else {
            return;
        };

        let result = utils::create_dir_all(path)
            .map_err(anyhow::Error::from)
            .and_then(|()| {
                fs_extra::dir::copy(
                    working_dir.path(),
                    path,
                    &fs_extra::dir::CopyOptions {
                        overwrite: true,
                        skip_exist: false,
                        ..Default::default()
                    },
                )
                .map_err(anyhow::Error::from)
            });

        match result {
            Ok(_) => info!(
                "preserved `{}` in `{}`",
                working_dir.path().display(),
                path.display()
            ),
            Err(e) => error!(
                "failed to copy `{}` to `{}`: {:?}",
                working_dir.path().display(),
                path.display(),
                e
            ),
        }
    }

    fn export_sheet(
        &self,
        book: &Spreadsheet,
        index: usize,
        sheet: &SheetTarget,
        working_dir: &TempDir,
    ) -> Result<(), ExportError> {
        let stem = format!("sheet-{:02}", index + 1);
        let xlsx = working_dir.path().join(format!("{}.xlsx", stem));
        let pdf = working_dir.path().join(format!("{}.pdf", stem));

        let copy = single_sheet_copy(book, sheet.name())?;
        umya_spreadsheet::writer::xlsx::write(&copy, &xlsx).map_err(|source| {
            ExportError::SheetCopy {
                path: xlsx.clone(),
                source,
            }
        })?;

        info!("converting `{}` to pdf", sheet.name());
        let output = self.convert(&xlsx, working_dir.path())?;

        if !output.status.success() {
            return Err(ExportError::Conversion {
                sheet: sheet.name().to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !pdf.exists() {
            return Err(ExportError::MissingOutput { path: pdf });
        }

        utils::copy(&pdf, sheet.output())?;

        Ok(())
    }
}

impl PdfExporter for LibreOfficeExporter {
    fn name(&self) -> &str {
        "libreoffice"
    }

    fn export(&self, job: &ExportJob) -> Result<Vec<PathBuf>, ExportError> {
        let book = umya_spreadsheet::reader::xlsx::read(job.workbook()).map_err(|source| {
            ExportError::Workbook {
                path: job.workbook().to_path_buf(),
                source,
            }
        })?;

        // removed together with everything in it, when it goes out of scope
        let working_dir = TempDir::new()?;
        debug!("working_dir: {}", working_dir.path().display());

        let mut result = Vec::with_capacity(job.sheets().len());
        for (index, sheet) in job.sheets().iter().enumerate() {
            if let Err(e) = self.export_sheet(&book, index, sheet, &working_dir) {
                self.preserve(&working_dir);
                return Err(e);
            }

            result.push(sheet.output().to_path_buf());
        }

        Ok(result)
    }
}
