//! Tests both export strategies against fake `soffice` and `osascript`
//! executables.
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use timesheet_filler::export::{export_sheets_to_pdf, ExportError, ExportSettings};
use timesheet_filler::sheet::SheetLayout;
use timesheet_filler::{generate_timesheets, FILLED_WORKBOOK};

use pretty_assertions::assert_eq;

mod common;

/// Settings that can not find any of the real programs.
fn isolated_settings(dir: &Path) -> ExportSettings {
    let mut settings = ExportSettings::default();
    settings
        .excel_app(dir.join("Microsoft Excel.app"))
        .converter_paths([])
        .converter_name("no-such-converter-on-this-host");
    settings
}

fn converter_settings(dir: &Path) -> ExportSettings {
    let mut settings = isolated_settings(dir);
    settings.converter_paths([common::fake_soffice(dir)]);
    settings
}

fn excel_settings(dir: &Path, combined_source: &Path) -> ExportSettings {
    fs::create_dir(dir.join("Microsoft Excel.app")).unwrap();

    let mut settings = isolated_settings(dir);
    settings.osascript(common::fake_osascript(dir, combined_source));
    settings
}

#[test]
fn test_nothing_installed() {
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01", "2026-02"]);

    let result = export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &isolated_settings(dir.path()),
    );

    assert!(matches!(result, Err(ExportError::Unavailable { .. })));
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_converter_exports_every_sheet_in_order() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01", "2026-02", "2026-03"]);

    let paths = export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &converter_settings(dir.path()),
    )
    .unwrap();

    let names = paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Smith 1-26.pdf", "Smith 2-26.pdf", "Smith 3-26.pdf"]);

    for path in &paths {
        assert!(fs::metadata(path).unwrap().len() > 0);
        assert!(path.starts_with(dunce::canonicalize(&output_dir).unwrap()));
    }

    // every sheet was converted from a workbook that only contains that sheet
    let inputs = ["sheet-01", "sheet-02", "sheet-03"].map(|stem| {
        common::sheet_names(&common::read_book(
            &dir.path().join("inputs").join(format!("{}.xlsx", stem)),
        ))
    });
    assert_eq!(
        inputs,
        [
            vec!["2026-01".to_string()],
            vec!["2026-02".to_string()],
            vec!["2026-03".to_string()],
        ]
    );

    // the converter only writes into its working directory
    assert_eq!(
        common::pdfs_in(&output_dir),
        vec!["Smith 1-26.pdf", "Smith 2-26.pdf", "Smith 3-26.pdf"]
    );
}

#[test]
fn test_existing_pdfs_are_overwritten() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-04"]);
    fs::create_dir_all(&output_dir).unwrap();
    fs::write(output_dir.join("Smith 4-26.pdf"), "old").unwrap();

    export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &converter_settings(dir.path()),
    )
    .unwrap();

    let content = fs::read_to_string(output_dir.join("Smith 4-26.pdf")).unwrap();
    assert!(content.starts_with("%PDF"));
}

#[test]
fn test_sheet_without_period_aborts_before_converting() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01", "Notes"]);

    let result = export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &converter_settings(dir.path()),
    );

    assert!(matches!(result, Err(ExportError::InvalidSheetName(ref name)) if name == "Notes"));
    assert_eq!(
        fs::read_dir(dir.path().join("inputs")).unwrap().count(),
        0,
        "the converter should not have been called"
    );
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_failing_converter() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let preserve = dir.path().join("preserved");
    common::make_template(&workbook, &["2026-01", "2026-02"]);

    let mut settings = isolated_settings(dir.path());
    settings
        .converter_paths([common::write_script(
            &dir.path().join("soffice"),
            "echo 'source file could not be loaded' >&2\nexit 1\n",
        )])
        .preserve_dir(&preserve);

    let result = export_sheets_to_pdf(
        &workbook,
        dir.path().join("output"),
        "Smith",
        "26",
        &settings,
    );

    match result {
        Err(ExportError::Conversion {
            sheet,
            status,
            stderr,
        }) => {
            assert_eq!(sheet, "2026-01");
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "source file could not be loaded");
        }
        other => panic!("expected a conversion error, got {:?}", other),
    }

    // the working directory with the single sheet workbook was kept
    assert_eq!(fs::read_dir(&preserve).unwrap().count(), 1);
}

#[test]
fn test_converter_without_output() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01", "2026-02"]);

    let mut settings = isolated_settings(dir.path());
    settings.converter_paths([common::write_script(&dir.path().join("soffice"), "exit 0\n")]);

    let result = export_sheets_to_pdf(&workbook, &output_dir, "Smith", "26", &settings);

    match result {
        Err(ExportError::MissingOutput { path }) => {
            assert_eq!(path.file_name().unwrap(), "sheet-01.pdf");
        }
        other => panic!("expected a missing output error, got {:?}", other),
    }
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_converted_copies_select_their_only_sheet() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");

    let mut book = common::make_book(&["2026-01", "2026-02", "2026-03"]);
    book.get_workbook_view_mut().set_active_tab(2);
    umya_spreadsheet::writer::xlsx::write(&book, &workbook).unwrap();

    export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &converter_settings(dir.path()),
    )
    .unwrap();

    for stem in ["sheet-01", "sheet-02", "sheet-03"] {
        let copy = common::read_book(&dir.path().join("inputs").join(format!("{}.xlsx", stem)));
        assert_eq!(*copy.get_workbook_view().get_active_tab(), 0, "{}", stem);
    }
}

#[test]
fn test_excel_splits_the_combined_pdf() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    let combined_source = dir.path().join("printed.pdf");
    common::make_template(&workbook, &["2026-01", "2026-02", "2026-03"]);
    common::make_pdf(&combined_source, &[101, 102, 103]);

    let paths = export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &excel_settings(dir.path(), &combined_source),
    )
    .unwrap();

    assert_eq!(paths.len(), 3);
    for (path, (name, width)) in paths
        .iter()
        .zip([("Smith 1-26.pdf", 101), ("Smith 2-26.pdf", 102), ("Smith 3-26.pdf", 103)])
    {
        assert_eq!(path.file_name().unwrap().to_string_lossy(), name);
        assert!(fs::metadata(path).unwrap().len() > 0);
        assert_eq!(common::page_widths(path), vec![width]);
    }

    // the combined pdf is removed after splitting
    assert!(!output_dir.join("_combined.pdf").exists());
    assert_eq!(common::pdfs_in(&output_dir).len(), 3);
}

#[test]
fn test_excel_with_too_few_pages() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    let combined_source = dir.path().join("printed.pdf");
    common::make_template(&workbook, &["2026-01", "2026-02", "2026-03"]);
    common::make_pdf(&combined_source, &[101, 102]);

    let result = export_sheets_to_pdf(
        &workbook,
        &output_dir,
        "Smith",
        "26",
        &excel_settings(dir.path(), &combined_source),
    );

    assert!(matches!(
        result,
        Err(ExportError::PageCount {
            pages: 2,
            sheets: 3
        })
    ));
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_excel_automation_fails() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    common::make_template(&workbook, &["2026-01"]);
    fs::create_dir(dir.path().join("Microsoft Excel.app")).unwrap();

    let mut settings = isolated_settings(dir.path());
    settings.osascript(common::write_script(
        &dir.path().join("osascript"),
        "echo 'Microsoft Excel got an error' >&2\nexit 1\n",
    ));

    let result = export_sheets_to_pdf(&workbook, dir.path().join("output"), "Smith", "26", &settings);

    match result {
        Err(ExportError::Automation { status, stderr }) => {
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "Microsoft Excel got an error");
        }
        other => panic!("expected an automation error, got {:?}", other),
    }
}

#[test]
fn test_excel_automation_fails_with_a_lot_of_output() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    common::make_template(&workbook, &["2026-01"]);
    fs::create_dir(dir.path().join("Microsoft Excel.app")).unwrap();

    let mut settings = isolated_settings(dir.path());
    settings
        .osascript(common::write_script(
            &dir.path().join("osascript"),
            "head -c 300000 /dev/zero | tr '\\0' 'x' >&2\nexit 1\n",
        ))
        .excel_timeout(Duration::from_secs(60));

    let result = export_sheets_to_pdf(&workbook, dir.path().join("output"), "Smith", "26", &settings);

    match result {
        Err(ExportError::Automation { status, stderr }) => {
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "x".repeat(200));
        }
        other => panic!("expected an automation error, got {:?}", other),
    }
}

#[test]
fn test_excel_without_combined_pdf() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01", "2026-02"]);
    fs::create_dir(dir.path().join("Microsoft Excel.app")).unwrap();

    let mut settings = isolated_settings(dir.path());
    settings.osascript(common::write_script(&dir.path().join("osascript"), "exit 0\n"));

    let result = export_sheets_to_pdf(&workbook, &output_dir, "Smith", "26", &settings);

    match result {
        Err(ExportError::MissingOutput { path }) => {
            assert_eq!(path.file_name().unwrap(), "_combined.pdf");
        }
        other => panic!("expected a missing output error, got {:?}", other),
    }
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_excel_automation_times_out() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let workbook = dir.path().join("filled.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&workbook, &["2026-01"]);
    fs::create_dir(dir.path().join("Microsoft Excel.app")).unwrap();

    let mut settings = isolated_settings(dir.path());
    settings
        .osascript(common::write_script(
            &dir.path().join("osascript"),
            "exec sleep 30\n",
        ))
        .excel_timeout(Duration::from_millis(300));

    let result = export_sheets_to_pdf(&workbook, &output_dir, "Smith", "26", &settings);

    assert!(matches!(result, Err(ExportError::Timeout(_))));
    assert_eq!(common::pdfs_in(&output_dir), Vec::<String>::new());
}

#[test]
fn test_generate_fills_and_exports() {
    let _guard = common::process_lock();
    let dir = tempfile::TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output_dir = dir.path().join("output");
    common::make_template(&template, &["2026-01", "2026-02"]);

    let generated = generate_timesheets(
        &template,
        &common::person(),
        &SheetLayout::default(),
        &output_dir,
        "26",
        &converter_settings(dir.path()),
    )
    .unwrap();

    assert_eq!(generated.workbook, output_dir.join(FILLED_WORKBOOK));
    assert_eq!(
        common::pdfs_in(&output_dir),
        vec!["Smith 1-26.pdf", "Smith 2-26.pdf"]
    );

    // the converted copies contain the filled values
    let first = common::read_book(&dir.path().join("inputs").join("sheet-01.xlsx"));
    assert_eq!(
        first.get_sheet(&0).unwrap().get_value("E6"),
        "John Michael Smith"
    );
}
