//! esgdash - ESG metrics viewer for construction companies
//!
//! Loads the record collection once, applies the selections given on the
//! command line and renders the resulting view as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid data, config, I/O, etc.)
//!   2 - Report rendered, but one or more selections had no data

use anyhow::{Context, Result};
use esgdash::cli::{Args, ModeArg, OutputFormat};
use esgdash::config::{Config, CONFIG_FILE_NAME};
use esgdash::report::{self, Report};
use esgdash::{DatasetStore, Session};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read first so its `verbose` setting can pick the log level
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("esgdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .esgdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the data path, scoring weights, and report options.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, build the session view and write the report.
/// Returns the exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    let store = DatasetStore::new(config.data.path.clone());
    let dataset = {
        let spinner = loading_spinner(args.quiet);
        let result = store.load();
        spinner.finish_and_clear();
        result.with_context(|| format!("Failed to load {}", store.path().display()))?
    };

    let session = build_session(args, config);
    info!("Rendering {}", session.mode());
    let view = session.view(dataset);

    let source = store.path().display().to_string();
    let report = Report::from_view(&view, dataset, &source, &config.report.options());

    match (&args.output, args.format) {
        (Some(path), OutputFormat::Json) => report::write_json_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        (Some(path), OutputFormat::Csv) => report::write_csv_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        (Some(path), OutputFormat::Markdown) => report::write_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        (None, OutputFormat::Json) => println!("{}", report::generate_json_report(&report)?),
        (None, OutputFormat::Csv) => print!("{}", report::generate_csv_report(&report)?),
        (None, OutputFormat::Markdown) => print!("{}", report::generate_markdown_report(&report)),
    }

    if let Some(ref path) = args.output {
        if !args.quiet {
            eprintln!("✅ Report saved to: {}", path.display());
        }
    }

    if !view.is_complete() {
        for e in view.errors() {
            warn!("{}", e);
        }
        if !args.quiet {
            eprintln!("\n⛔ Some selections had no data (exit code 2).");
        }
        return Ok(2);
    }

    Ok(0)
}

/// Translate command-line selections into session state.
fn build_session(args: &Args, config: &Config) -> Session {
    let mut session = Session::new();
    session.weights = config.scoring.weights();

    if args.mode == ModeArg::Company {
        session.toggle_mode();
    }

    session.select_year(args.year);
    if let Some(ref company) = args.company {
        session.select_company(company.as_str());
    }
    session.set_year_range(args.year_range());
    if let Some(ref companies) = args.companies {
        session.select_companies(companies.iter().map(String::as_str));
    }
    session.include_ranking = args.rank;

    session
}

fn loading_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Loading ESG data...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            if !args.quiet {
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            }
            Ok(Config::default())
        }
    }
}
