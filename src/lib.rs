pub mod asset_path;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod search;
pub mod ui;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::ValidationError;
use export::{ExportFormat, ExportOptions};
use search::{Phrase, Scanner};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "nas",
    version,
    about = "Phrase search over directories of JSON asset-metadata records"
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Folder to search (overrides the config file)
    #[arg(long, env = "NAS_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// When to use colors in text output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive search screen (default)
    Tui,
    /// Search once and print the results
    Search {
        /// Phrase to look for (case and punctuation are ignored)
        phrase: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::PlainText)]
        format: ExportFormat,

        /// Shorthand for --format json
        #[arg(long, conflicts_with = "format")]
        json: bool,

        /// Show the derived asset path under each match
        #[arg(long)]
        asset_paths: bool,
    },
    /// Derive the asset path for a record found in a data file
    AssetPath {
        /// Data file path relative to the search folder
        relative_path: String,

        /// The record as a JSON object
        record: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Error carrying a specific process exit code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

/// Exit code for an error returned from [`run`]: 2 for usage and
/// validation problems, the carried code for [`CliError`], 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.code;
    }
    if err.downcast_ref::<ValidationError>().is_some() {
        return 2;
    }
    1
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with(cli)
}

pub fn run_with(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;
    apply_color(cli.color);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    let root = config.resolve_root(cli.root);

    match cli.command {
        None | Some(Commands::Tui) => run_tui(&config, root),
        Some(Commands::Search {
            phrase,
            format,
            json,
            asset_paths,
        }) => {
            let format = if json { ExportFormat::Json } else { format };
            run_search(&config, root, &phrase, format, asset_paths)
        }
        Some(Commands::AssetPath {
            relative_path,
            record,
        }) => run_asset_path(&config, &relative_path, &record),
    }
}

fn run_tui(config: &Config, root: PathBuf) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        return Err(CliError {
            code: 2,
            message: "TUI is disabled: stdout is not a terminal. Use `nas search <phrase>`."
                .into(),
        }
        .into());
    }
    let app = ui::tui::App::new(
        Scanner::new(config.scan_options()),
        config.asset_rule(),
        root,
    );
    ui::tui::run_tui(app)
}

fn run_search(
    config: &Config,
    root: PathBuf,
    raw_phrase: &str,
    format: ExportFormat,
    asset_paths: bool,
) -> Result<()> {
    let phrase = Phrase::parse(raw_phrase)?;
    let scanner = Scanner::new(config.scan_options());
    let results = scanner.scan(&root, &phrase)?;

    let options = ExportOptions {
        asset_paths: asset_paths.then(|| config.asset_rule()),
    };
    let output = export::export_results(&results, format, &options);
    print!("{output}");
    if format == ExportFormat::Json {
        println!();
    }
    Ok(())
}

fn run_asset_path(config: &Config, relative_path: &str, record: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(record).context("record is not valid JSON")?;
    let serde_json::Value::Object(record) = value else {
        anyhow::bail!("record must be a JSON object");
    };
    let rule = config.asset_rule();
    match rule.derive(relative_path, &record) {
        Some(path) => {
            println!("{path}");
            Ok(())
        }
        None => Err(CliError {
            code: 1,
            message: format!("record has no '{}' field", rule.field),
        }
        .into()),
    }
}

fn init_logging(verbose: u8, log_file: Option<&std::path::Path>, interactive: bool) -> Result<()> {
    let default_level = match verbose {
        0 if interactive && log_file.is_none() => "off",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}

fn apply_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if !std::io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}
