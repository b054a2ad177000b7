use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{info, warn};

use crate::export::{self, ExportError, ExportJob, PdfExporter};

/// The intermediate pdf holding every worksheet.
const COMBINED_PDF: &str = "_combined.pdf";

fn escape_applescript(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

#[must_use]
fn make_applescript(workbook: &Path, combined: &Path) -> String {
    format!(
        concat!(
            "tell application \"Microsoft Excel\"\n",
            "    open \"{workbook}\"\n",
            "    save active workbook in \"{combined}\" as PDF file format\n",
            "    close active workbook without saving\n",
            "end tell\n",
        ),
        workbook = escape_applescript(workbook),
        combined = escape_applescript(combined),
    )
}

/// Exports through Microsoft Excel on macOS.
pub struct ExcelExporter {
    osascript: PathBuf,
    timeout: Duration,
}

impl ExcelExporter {
    pub fn new(osascript: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            osascript: osascript.into(),
            timeout,
        }
    }

    fn export_combined(&self, job: &ExportJob, combined: &Path) -> Result<(), ExportError> {
        if combined.exists() {
            fs::remove_file(combined)?;
        }

        info!("exporting workbook to pdf");
        let output = export::output_with_timeout(
            Command::new(&self.osascript)
                .arg("-e")
                .arg(make_applescript(job.workbook(), combined)),
            self.timeout,
        )?
        .ok_or(ExportError::Timeout(self.timeout))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::Automation {
                status: output.status.code(),
                stderr: stderr.trim().chars().take(200).collect(),
            });
        }

        if !combined.exists() {
            return Err(ExportError::MissingOutput {
                path: combined.to_path_buf(),
            });
        }

        Ok(())
    }
}

impl PdfExporter for ExcelExporter {
    fn name(&self) -> &str {
        "excel"
    }

    fn export(&self, job: &ExportJob) -> Result<Vec<PathBuf>, ExportError> {
        let combined = job.output_dir().join(COMBINED_PDF);
        self.export_combined(job, &combined)?;

        info!("splitting into {} individual pdfs", job.sheets().len());
        let result = export::split_pages(&combined, job.sheets());

        if let Err(e) = fs::remove_file(&combined) {
            warn!("failed to remove `{}`: {}", combined.display(), e);
        }

        result
    }
}
