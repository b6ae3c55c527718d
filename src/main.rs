//! csvtidy - clean, rename, merge and export CSV tables

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::info;
use tracing_subscriber::EnvFilter;

use csvtidy::config::{CleanOptions, Config, ExportOptions, LoadOptions, MergeOptions, PreviewFormat};
use csvtidy::output::{render_preview, CLEANED_FILE_NAME, MAPPED_FILE_NAME, MERGED_FILE_NAME};
use csvtidy::parser::load_file;
use csvtidy::transform::parse_mapping_pair;
use csvtidy::{Action, Session, Slot};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPreviewFormat {
    Table,
    Json,
}

impl From<CliPreviewFormat> for PreviewFormat {
    fn from(f: CliPreviewFormat) -> Self {
        match f {
            CliPreviewFormat::Table => PreviewFormat::Table,
            CliPreviewFormat::Json => PreviewFormat::Json,
        }
    }
}

/// Clean, rename, merge and export CSV tables
#[derive(Parser, Debug)]
#[command(name = "csvtidy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the first N rows of the result to stderr
    #[arg(long, value_name = "N", default_value_t = 0)]
    preview: usize,

    /// Preview format
    #[arg(long, value_enum, default_value = "table")]
    format: CliPreviewFormat,

    /// Field delimiter for input and output
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Field values to read as missing besides the empty field (comma-separated)
    #[arg(long, value_delimiter = ',')]
    na_values: Vec<String>,
}

impl OutputArgs {
    fn config(&self) -> Result<Config> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .context("delimiter must be a single ASCII character")?;

        Ok(Config::new()
            .with_load_options(
                LoadOptions::default()
                    .with_delimiter(delimiter)
                    .with_na_values(self.na_values.clone()),
            )
            .with_export_options(ExportOptions { delimiter })
            .with_preview_rows(self.preview)
            .with_preview_format(self.format.into()))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop empty rows and columns, optionally strip punctuation and rename
    Clean {
        /// CSV file to clean
        file: PathBuf,

        /// Remove everything but ASCII letters, digits and whitespace from text
        #[arg(long)]
        sanitize: bool,

        /// Keep fully empty rows and columns
        #[arg(long)]
        keep_empty: bool,

        /// Rename a column after cleaning (repeatable)
        #[arg(long, value_name = "OLD=NEW", value_parser = parse_mapping_pair)]
        rename: Vec<(String, String)>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Left-join RIGHT onto LEFT on a shared column
    Merge {
        /// Main CSV file; every row is kept
        left: PathBuf,

        /// CSV file to merge in
        right: PathBuf,

        /// Column present in both files to join on
        #[arg(long)]
        on: String,

        /// Suffixes for other columns present in both files
        #[arg(long, value_name = "LEFT,RIGHT", value_parser = parse_suffixes)]
        suffixes: Option<(String, String)>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Rename columns
    Map {
        /// CSV file to map
        file: PathBuf,

        /// Column mapping (repeatable)
        #[arg(long, value_name = "OLD=NEW", value_parser = parse_mapping_pair, required = true)]
        rename: Vec<(String, String)>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// List the columns two files share
    Columns {
        left: PathBuf,
        right: PathBuf,
    },
}

fn parse_suffixes(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once(',') {
        Some((left, right)) if left != right => Ok((left.to_string(), right.to_string())),
        _ => Err(format!("expected two different suffixes as LEFT,RIGHT, got '{}'", s)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_labeled(Color::Red, "error", &format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean {
            file,
            sanitize,
            keep_empty,
            rename,
            out,
        } => {
            let config = out.config()?.with_clean_options(
                CleanOptions::default()
                    .with_drop_empty(!keep_empty)
                    .with_sanitize_text(sanitize),
            );

            let mut steps = vec![
                upload(Slot::Primary, &file)?,
                (Action::Clean(config.clean), "Failed to clean table".to_string()),
            ];
            if !rename.is_empty() {
                steps.push((
                    Action::Rename(rename.into_iter().collect()),
                    "Failed to rename columns".to_string(),
                ));
            }

            let session = run_steps(Session::new(), steps, &config)?;
            export(&session, &config, &out, CLEANED_FILE_NAME)
        }

        Command::Merge {
            left,
            right,
            on,
            suffixes,
            out,
        } => {
            let mut merge = MergeOptions::default();
            if let Some((l, r)) = suffixes {
                merge = merge.with_suffixes(l, r);
            }
            let config = out.config()?.with_merge_options(merge);

            let session = run_steps(
                Session::new(),
                vec![upload(Slot::Primary, &left)?, upload(Slot::Secondary, &right)?],
                &config,
            )?;
            if session.merge_candidates().is_empty() {
                bail!("No matching columns found to merge.");
            }

            let context = format!("Failed to merge on column '{}'", on);
            let session = run_steps(session, vec![(Action::Merge { key: on }, context)], &config)?;
            export(&session, &config, &out, MERGED_FILE_NAME)
        }

        Command::Map { file, rename, out } => {
            let config = out.config()?;
            let steps = vec![
                upload(Slot::Primary, &file)?,
                (
                    Action::Rename(rename.into_iter().collect()),
                    "Failed to rename columns".to_string(),
                ),
            ];
            let session = run_steps(Session::new(), steps, &config)?;
            export(&session, &config, &out, MAPPED_FILE_NAME)
        }

        Command::Columns { left, right } => {
            let config = Config::new();
            let left = load_file(&left, &config.load)
                .with_context(|| format!("Failed to load file: {}", left.display()))?;
            let right = load_file(&right, &config.load)
                .with_context(|| format!("Failed to load file: {}", right.display()))?;
            for warning in left.warnings.iter().chain(&right.warnings) {
                print_labeled(Color::Yellow, "warning", &warning.to_string());
            }

            let common = left.table.common_columns(&right.table);
            if common.is_empty() {
                bail!("No matching columns found to merge.");
            }
            let mut stdout = io::stdout().lock();
            for name in common {
                writeln!(stdout, "{}", name)?;
            }
            Ok(())
        }
    }
}

/// Read a file into an upload action
fn upload(slot: Slot, path: &Path) -> Result<(Action, String)> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok((
        Action::Upload { slot, bytes },
        format!("Failed to load file: {}", path.display()),
    ))
}

/// Apply actions in order, reporting load warnings as they come
fn run_steps(mut session: Session, steps: Vec<(Action, String)>, config: &Config) -> Result<Session> {
    for (action, context) in steps {
        let outcome = session.apply(&action, config).context(context)?;
        for notice in &outcome.notices {
            print_labeled(Color::Yellow, "warning", &notice.to_string());
        }
        session = outcome.session;
    }
    Ok(session)
}

/// Export the primary table to the output file or stdout
fn export(session: &Session, config: &Config, out: &OutputArgs, default_name: &str) -> Result<()> {
    let file_name = out
        .output
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| default_name.to_string());

    let outcome = session
        .apply(&Action::Export { file_name }, config)
        .context("Failed to export table")?;
    let download = outcome
        .download
        .context("Export produced no output")?;

    if config.preview_rows > 0 {
        if let Some(table) = session.table(Slot::Primary) {
            render_preview(table, config.preview_rows, config.preview_format, &mut io::stderr())?;
        }
    }

    match &out.output {
        Some(path) => {
            fs::write(path, &download.bytes)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            info!(file = %path.display(), bytes = download.bytes.len(), "wrote {}", download.file_name);
        }
        None => io::stdout().lock().write_all(&download.bytes)?,
    }
    Ok(())
}

fn print_labeled(color: Color, label: &str, message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stderr, "{}", label);
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {}", message);
}
