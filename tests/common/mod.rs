#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use lopdf::{dictionary, Document, Object, Stream};
use timesheet_filler::input::PersonConfig;
use umya_spreadsheet::Spreadsheet;

pub const DETAILS: &str = concat!(
    //
    "[person]\n",
    "name = \"John Michael Smith\"\n",
    "a_number = \"A00123456\"\n",
    "position_number = \"P12345\"\n",
    "title = \"Graduate Research Assistant\"\n",
    "department = \"Earth System Science Center\"\n",
    "home_labor = \"24-3010\"\n",
    "fte = \"0.50\"\n",
    "\n",
    "[[labor]]\n",
    "org_index = \"260101\"\n",
    "account_code = \"61120\"\n",
    "percent = \"50\"\n",
    "\n",
    "[[labor]]\n",
    "org_index = \"260102\"\n",
    "account_code = \"61120\"\n",
    "percent = \".5\"\n",
    "\n",
    "[[labor]]\n",
    "org_index = \"260103\"\n",
    "account_code = \"61130\"\n",
    "percent = \"tbd\"\n",
);

/// The same person, but without a labor distribution.
pub fn details_without_labor() -> String {
    DETAILS
        .split("[[labor]]")
        .next()
        .expect("details should have a person table")
        .to_string()
}

#[must_use]
pub fn person() -> PersonConfig {
    PersonConfig::from_toml_str(DETAILS).expect("details should be valid")
}

/// A workbook with the given sheets and some content where the labor
/// distribution would go.
#[must_use]
pub fn make_book(sheet_names: &[&str]) -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0)
        .expect("a new file has one sheet")
        .set_name(sheet_names[0]);

    for name in &sheet_names[1..] {
        book.new_sheet(*name).expect("sheet names should be unique");
    }

    let first = book.get_sheet_mut(&0).expect("first sheet exists");
    first.get_cell_mut("C14").set_value_string("Org Index");
    first.get_cell_mut("D14").set_value_string("Account");
    first.get_cell_mut("E14").set_value_string("Percent");
    first.get_cell_mut("C15").set_value_string("template placeholder");

    book
}

pub fn make_template(path: &Path, sheet_names: &[&str]) {
    umya_spreadsheet::writer::xlsx::write(&make_book(sheet_names), path)
        .expect("should be able to write the template");
}

pub fn read_book(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).expect("should be able to read the workbook")
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    (0..book.get_sheet_count())
        .map(|index| book.get_sheet(&index).unwrap().get_name().to_string())
        .collect()
}

/// A pdf with one page per width, every page `width` points wide.
pub fn make_pdf(path: &Path, widths: &[i64]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for width in widths {
        let contents_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 842.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        });
        kids.push(Object::from(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => widths.len() as i64,
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("should be able to save the pdf");
}

/// The widths of all pages in the pdf at `path`.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("should be a valid pdf");

    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that write and then run executables, otherwise a
/// concurrent fork can keep the script open for writing (ETXTBSY).
pub fn process_lock() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}", body)).expect("should be able to write the script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("should be able to make the script executable");

    path.to_path_buf()
}

/// A stand-in for `soffice --headless --convert-to pdf --outdir <dir> <file>`.
///
/// Every converted workbook is copied next to the script into `inputs/`.
#[cfg(unix)]
pub fn fake_soffice(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir.join("inputs")).unwrap();

    write_script(
        &dir.join("soffice"),
        concat!(
            "here=$(dirname \"$0\")\n",
            "outdir=\"$5\"\n",
            "input=\"$6\"\n",
            "name=$(basename \"$input\" .xlsx)\n",
            "cp \"$input\" \"$here/inputs/\"\n",
            "printf '%%PDF-1.4\\n%% %s\\n' \"$name\" > \"$outdir/$name.pdf\"\n",
        ),
    )
}

/// A stand-in for `osascript -e <script>` that "prints" `source` to the
/// path the script asks excel to save to.
#[cfg(unix)]
pub fn fake_osascript(dir: &Path, source: &Path) -> PathBuf {
    write_script(
        &dir.join("osascript"),
        &format!(
            concat!(
                "combined=$(printf '%s\\n' \"$2\" | sed -n 's/.*save active workbook in \"\\(.*\\)\" as PDF.*/\\1/p')\n",
                "cp \"{source}\" \"$combined\"\n",
            ),
            source = source.display()
        ),
    )
}

/// All files in `dir` with the extension `pdf`, sorted by name.
pub fn pdfs_in(dir: &Path) -> Vec<String> {
    let mut result = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .filter(|name| name.ends_with(".pdf"))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    result.sort();
    result
}
