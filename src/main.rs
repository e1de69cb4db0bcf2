use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::control;
use tracing_subscriber::EnvFilter;

use dagsort::config::{self, Config, ConfigUpdate, OutputMode};
use dagsort::loader::{load_graph, GraphFormat, LoadError, LoadedGraph};
use dagsort::report::{self, SortReport, VerifyReport};
use dagsort::{sort, verify_order, SortError, VerifyError};

// ======================================================
// CLI
// ======================================================

#[derive(Parser)]
#[command(name = "dagsort")]
#[command(about = "Topological sorting for adjacency-list graphs")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Print machine-readable JSON instead of the human summary.
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Graph file format. Defaults to the file extension, or JSON for stdin.
    #[arg(long, global = true, value_enum)]
    format: Option<GraphFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a topological order of the graph in FILE ("-" reads stdin).
    Sort { file: PathBuf },
    /// Report whether the graph in FILE can be sorted, without printing the order.
    Check { file: PathBuf },
    /// Check that a given order is a topological order of the graph in FILE.
    Verify {
        file: PathBuf,
        /// Comma-separated node identifiers, e.g. 0,2,1
        #[arg(long, value_delimiter = ',')]
        order: Vec<usize>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Version,
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    Set {
        #[arg(long, value_enum)]
        output: Option<OutputMode>,

        #[arg(long)]
        color: Option<bool>,

        /// Default for debug logging; distinct from the global --verbose flag.
        #[arg(long)]
        verbose_logs: Option<bool>,
    },
    /// Delete the config file and fall back to defaults.
    Reset,
}

/// Settings after merging the config file with command-line flags.
struct Settings {
    json: bool,
    format: Option<GraphFormat>,
}

// ======================================================
// MAIN
// ======================================================

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(report::EXIT_FAILURE);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Sort { file } => run_sort(&file, &prepare(&cli.global)?, true),
        Commands::Check { file } => run_sort(&file, &prepare(&cli.global)?, false),
        Commands::Verify { file, order } => run_verify(&file, &order, &prepare(&cli.global)?),
        Commands::Config { command } => {
            init_tracing(cli.global.verbose);
            run_config(&command)
        }
        Commands::Version => {
            println!("dagsort {}", env!("CARGO_PKG_VERSION"));
            Ok(report::EXIT_OK)
        }
    }
}

/// Loads the config file, applies flag overrides and installs logging.
fn prepare(args: &GlobalArgs) -> Result<Settings> {
    let config = config::load_config()?;
    init_tracing(args.verbose || config.verbose);

    if args.no_color || !config.color {
        control::set_override(false);
    }

    Ok(Settings {
        json: args.json || config.output == OutputMode::Json,
        format: args.format,
    })
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ======================================================
// SORT / CHECK
// ======================================================

fn run_sort(file: &Path, settings: &Settings, include_order: bool) -> Result<i32> {
    let loaded = match load(file, settings)? {
        Ok(loaded) => loaded,
        Err(err) => return print_sort_report(&SortReport::rejected(&err), settings),
    };

    let outcome = sort(loaded.as_deref());
    print_sort_report(&SortReport::new(&loaded, &outcome, include_order), settings)
}

// ======================================================
// VERIFY
// ======================================================

fn run_verify(file: &Path, order: &[usize], settings: &Settings) -> Result<i32> {
    let loaded = match load(file, settings)? {
        Ok(loaded) => loaded,
        Err(err) => return print_sort_report(&SortReport::rejected(&err), settings),
    };

    let outcome = match loaded.as_deref() {
        Some(graph) => verify_order(graph, order),
        None => Err(VerifyError::Graph(SortError::NullInput)),
    };
    let report = VerifyReport::new(&loaded, order, &outcome);

    if settings.json {
        println!("{}", report::render_json(&report)?);
    } else {
        print!("{}", report::render_verify_human(&report));
    }

    Ok(report.exit_code)
}

// ======================================================
// CONFIG
// ======================================================

fn run_config(command: &ConfigCommands) -> Result<i32> {
    match command {
        ConfigCommands::Show => {
            let path = config::config_path()?;
            let current = config::load_config_from(&path)?;
            println!("# {}", path.display());
            println!(
                "{}",
                serde_json::to_string_pretty(&current).context("Failed to serialize config")?
            );
        }
        ConfigCommands::Set {
            output,
            color,
            verbose_logs,
        } => {
            let mut current = config::load_config()?;
            current.apply(ConfigUpdate {
                output: *output,
                color: *color,
                verbose: *verbose_logs,
            });
            config::save_config(&current)?;
            println!("Config saved to {}", config::config_path()?.display());
        }
        ConfigCommands::Reset => {
            config::reset_config()?;
            let defaults = Config::default();
            println!(
                "Config reset (output: {:?}, color: {}, verbose: {})",
                defaults.output, defaults.color, defaults.verbose
            );
        }
    }

    Ok(report::EXIT_OK)
}

// ======================================================
// HELPERS
// ======================================================

/// Splits graph-content rejections (reported like sort failures) from
/// I/O and parse errors (fatal).
fn load(file: &Path, settings: &Settings) -> Result<Result<LoadedGraph, SortError>> {
    match load_graph(file, settings.format) {
        Ok(loaded) => Ok(Ok(loaded)),
        Err(LoadError::Graph(err)) => Ok(Err(err)),
        Err(err) => {
            Err(anyhow::Error::new(err).context(format!("Failed to load {}", file.display())))
        }
    }
}

fn print_sort_report(report: &SortReport, settings: &Settings) -> Result<i32> {
    if settings.json {
        println!("{}", report::render_json(report)?);
    } else {
        print!("{}", report::render_sort_human(report));
    }

    Ok(report.exit_code)
}
