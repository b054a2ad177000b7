use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::trace;

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Where to look for the programs that can turn a workbook into pdfs.
///
/// The [`Default`] describes a regular macOS or linux installation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    excel_app: PathBuf,
    osascript: PathBuf,
    excel_timeout: Duration,
    converter_paths: Vec<PathBuf>,
    converter_name: OsString,
    prefer_converter: bool,
    preserve_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            excel_app: "/Applications/Microsoft Excel.app".into(),
            osascript: "osascript".into(),
            excel_timeout: Duration::from_secs(120),
            converter_paths: vec![
                "/Applications/LibreOffice.app/Contents/MacOS/soffice".into(),
                "/opt/homebrew/bin/soffice".into(),
                "/usr/local/bin/soffice".into(),
                "/usr/bin/soffice".into(),
            ],
            converter_name: "soffice".into(),
            prefer_converter: false,
            preserve_dir: None,
        }
    }
}

impl ExportSettings {
    /// The application bundle whose presence means excel is installed.
    pub fn excel_app(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.excel_app = path.into();
        self
    }

    /// The program used to run the AppleScript that drives excel.
    pub fn osascript(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.osascript = path.into();
        self
    }

    pub fn excel_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.excel_timeout = timeout;
        self
    }

    /// Replaces the well-known locations of the converter.
    pub fn converter_paths(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> &mut Self {
        self.converter_paths = paths.into_iter().collect();
        self
    }

    /// The executable name searched for in `PATH`, if none of the well-known locations exist.
    pub fn converter_name(&mut self, name: impl Into<OsString>) -> &mut Self {
        self.converter_name = name.into();
        self
    }

    /// Use the converter, even if excel is installed.
    pub fn prefer_converter(&mut self, prefer_converter: bool) -> &mut Self {
        self.prefer_converter = prefer_converter;
        self
    }

    /// A failed conversion copies its working directory here.
    pub fn preserve_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.preserve_dir = Some(path.into());
        self
    }

    pub fn excel_app_path(&self) -> &Path {
        &self.excel_app
    }

    pub fn osascript_path(&self) -> &Path {
        &self.osascript
    }

    pub fn excel_timeout_duration(&self) -> Duration {
        self.excel_timeout
    }

    pub fn is_converter_preferred(&self) -> bool {
        self.prefer_converter
    }

    pub fn preserve_dir_path(&self) -> Option<&Path> {
        self.preserve_dir.as_deref()
    }

    /// Checks the well-known locations first and falls back to searching `PATH`.
    #[must_use]
    pub fn find_converter(&self) -> Option<PathBuf> {
        if let Some(path) = self.converter_paths.iter().find(|path| is_executable(path)) {
            return Some(path.clone());
        }

        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .map(|dir| dir.join(&self.converter_name))
            .inspect(|candidate| trace!("looking for converter at {}", candidate.display()))
            .find(|candidate| is_executable(candidate))
    }
}
