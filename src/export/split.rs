use std::path::{Path, PathBuf};

use log::{debug, warn};
use lopdf::Document;

use crate::export::{ExportError, SheetTarget};

/// Splits a pdf with one page per worksheet into one file per worksheet.
///
/// Page `i` of `combined` is written to the output of `sheets[i]`.
pub fn split_pages(combined: &Path, sheets: &[SheetTarget]) -> Result<Vec<PathBuf>, ExportError> {
    let document = Document::load(combined)?;
    let page_numbers = document.get_pages().into_keys().collect::<Vec<u32>>();

    if page_numbers.len() < sheets.len() {
        return Err(ExportError::PageCount {
            pages: page_numbers.len(),
            sheets: sheets.len(),
        });
    }

    if page_numbers.len() > sheets.len() {
        warn!(
            "`{}` has {} pages for {} worksheets, ignoring the last {} pages",
            combined.display(),
            page_numbers.len(),
            sheets.len(),
            page_numbers.len() - sheets.len()
        );
    }

    let mut result = Vec::with_capacity(sheets.len());
    for (sheet, &page) in sheets.iter().zip(&page_numbers) {
        let others = page_numbers
            .iter()
            .copied()
            .filter(|&number| number != page)
            .collect::<Vec<_>>();

        let mut single = document.clone();
        single.delete_pages(&others);
        single.prune_objects();
        single.compress();
        single.save(sheet.output())?;

        debug!("wrote page {} to `{}`", page, sheet.output().display());
        result.push(sheet.output().to_path_buf());
    }

    Ok(result)
}
