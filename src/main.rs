use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::info;
use seahorse::{App, Command, Context, Flag, FlagType};

use timesheet_filler::export::ExportSettings;
use timesheet_filler::input::PersonConfig;
use timesheet_filler::sheet::SheetLayout;
use timesheet_filler::{fill_timesheet, generate_timesheets, FILLED_WORKBOOK};

const DEFAULT_TEMPLATE: &str = "ESSC Labor Report Timesheet - 2026 BLANK.xlsx";
const DEFAULT_DETAILS: &str = "details.toml";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_YEAR: &str = "26";

/// How many of the exported pdfs are listed at the end.
const LISTED_PDFS: usize = 3;

fn set_env_if_absent<K: AsRef<OsStr>, V: AsRef<OsStr>>(var: K, default: impl FnOnce() -> V) {
    if env::var(var.as_ref()).is_err() {
        env::set_var(var, default());
    }
}

fn main() {
    set_env_if_absent("RUST_APP_LOG", || "info");
    color_backtrace::install();
    pretty_env_logger::init_custom_env("RUST_APP_LOG");

    run();
}

mod seahorse_exts {
    use core::fmt;
    use std::path::PathBuf;

    use log::error;
    use seahorse::Context;

    /// Logs the error and exits, seahorse actions can not return anything.
    pub fn exit_on_error<E: fmt::Debug>(result: Result<(), E>) {
        if let Err(e) = result {
            error!("{:?}", e);
            ::std::process::exit(1);
        }
    }

    pub trait ContextExt {
        fn context(&self) -> &Context;

        fn string_flag_or(&self, name: &str, default: &str) -> String {
            self.context()
                .string_flag(name)
                .unwrap_or_else(|_| default.to_string())
        }

        fn path_flag_or(&self, name: &str, default: &str) -> PathBuf {
            PathBuf::from(self.string_flag_or(name, default))
        }

        fn optional_path_flag(&self, name: &str) -> Option<PathBuf> {
            self.context().string_flag(name).ok().map(PathBuf::from)
        }
    }

    impl ContextExt for Context {
        fn context(&self) -> &Context {
            self
        }
    }
}

use seahorse_exts::{exit_on_error, ContextExt};

fn ensure_exists(path: &Path, what: &str, hint: Option<&str>) -> anyhow::Result<()> {
    if !path.exists() {
        if let Some(hint) = hint {
            info!("hint: {}", hint);
        }

        return Err(anyhow::anyhow!("{} not found: {}", what, path.display()));
    }

    Ok(())
}

fn load_inputs(context: &Context) -> anyhow::Result<(PathBuf, PersonConfig, SheetLayout)> {
    let template = context.path_flag_or("template", DEFAULT_TEMPLATE);
    let details = context.path_flag_or("details", DEFAULT_DETAILS);

    ensure_exists(&template, "Template", None)?;
    ensure_exists(
        &details,
        "Details file",
        Some("copy details.example.toml to details.toml and fill in your info"),
    )?;

    info!("loading config from {}", details.display());
    let config = PersonConfig::from_file(&details)
        .with_context(|| format!("failed to load `{}`", details.display()))?;
    info!("  Name: {} ({})", config.name(), config.last_name());
    info!("  A#: {}", config.a_number());
    info!("  Labor entries: {}", config.labor().len());

    let layout = match context.optional_path_flag("layout") {
        Some(path) => SheetLayout::from_toml_file(&path)
            .with_context(|| format!("failed to load layout `{}`", path.display()))?,
        None => SheetLayout::default(),
    };

    Ok((template, config, layout))
}

fn make(context: &Context) -> anyhow::Result<()> {
    let (template, config, layout) = load_inputs(context)?;
    let output_dir = context.path_flag_or("output-dir", DEFAULT_OUTPUT_DIR);
    let year = context.string_flag_or("year", DEFAULT_YEAR);

    let mut settings = ExportSettings::default();
    settings.prefer_converter(context.bool_flag("converter"));
    if let Some(dir) = context.optional_path_flag("preserve-dir") {
        settings.preserve_dir(dir);
    }

    info!("filling timesheet from {}", template.display());
    let generated = generate_timesheets(&template, &config, &layout, &output_dir, &year, &settings)?;
    info!("  saved filled workbook to {}", generated.workbook.display());

    info!(
        "  exported {} PDFs to {}",
        generated.pdfs.len(),
        output_dir.display()
    );
    for pdf in generated.pdfs.iter().take(LISTED_PDFS) {
        let name = pdf.file_name().unwrap_or(pdf.as_os_str());
        info!("    - {}", name.to_string_lossy());
    }

    if generated.pdfs.len() > LISTED_PDFS {
        info!("    ... and {} more", generated.pdfs.len() - LISTED_PDFS);
    }

    info!("Done!");

    Ok(())
}

fn fill(context: &Context) -> anyhow::Result<()> {
    let (template, config, layout) = load_inputs(context)?;
    let output = context
        .optional_path_flag("output")
        .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR).join(FILLED_WORKBOOK));

    info!("filling timesheet from {}", template.display());
    fill_timesheet(&template, &config, &layout, &output)?;
    info!("  saved filled workbook to {}", output.display());

    Ok(())
}

fn input_flags(command: Command) -> Command {
    command
        .flag(
            Flag::new("template", FlagType::String).description(format!(
                "[optional] Path to the blank timesheet template. Default: `{}`",
                DEFAULT_TEMPLATE
            )),
        )
        .flag(
            Flag::new("details", FlagType::String).description(format!(
                "[optional] Path to the details toml file. Default: `{}`",
                DEFAULT_DETAILS
            )),
        )
        .flag(
            Flag::new("layout", FlagType::String)
                .description("[optional] Path to a toml file that overrides the cell layout."),
        )
}

fn run() {
    let args: Vec<String> = env::args().collect();

    let make_command = input_flags(
        Command::new("make")
            .usage(format!("{} make [args]", args[0]))
            .description("Fills the timesheet and exports every sheet to a pdf."),
    )
    .flag(
        Flag::new("output-dir", FlagType::String).description(format!(
            "[optional] Directory to save the pdfs in. Default: `{}`",
            DEFAULT_OUTPUT_DIR
        )),
    )
    .flag(
        Flag::new("year", FlagType::String).description(format!(
            "[optional] Year suffix of the pdf names. Default: `{}`",
            DEFAULT_YEAR
        )),
    )
    .flag(
        Flag::new("converter", FlagType::Bool)
            .description("[optional] Use LibreOffice even if Excel is installed."),
    )
    .flag(
        Flag::new("preserve-dir", FlagType::String)
            .description("[optional] Keeps the files of a failed conversion in this directory."),
    )
    .action(|context: &Context| exit_on_error(make(context)));

    let fill_command = input_flags(
        Command::new("fill")
            .usage(format!("{} fill [args]", args[0]))
            .description("Only fills the timesheet, without exporting it."),
    )
    .flag(Flag::new("output", FlagType::String).description(format!(
        "[optional] Path of the filled workbook. Default: `{}/{}`",
        DEFAULT_OUTPUT_DIR, FILLED_WORKBOOK
    )))
    .action(|context: &Context| exit_on_error(fill(context)));

    let app = App::new(env!("CARGO_PKG_NAME"))
        .description(env!("CARGO_PKG_DESCRIPTION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .usage(format!("{} [command] [args]", args[0]))
        .command(make_command)
        .command(fill_command);

    app.run(args);
}
