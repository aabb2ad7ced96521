use clap::{Parser, Subcommand};
use hrcal::config::{self, AppMode};
use hrcal::data_provider::FixtureProvider;
use hrcal::{commands, tui};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "hrcal")]
#[command(about = "HR leave and activity calendar", long_about = "HR leave and activity calendar\n\nIf no command is specified, the program starts in interactive mode.")]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Calendar shown first in interactive mode
    #[arg(short, long, value_enum)]
    mode: Option<AppMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the public holidays of a year
    Holidays {
        /// Year (optional, defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// List the days of a year or month with weekend and holiday flags
    Days {
        /// Year (optional, defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (optional, whole year when omitted)
        #[arg(short, long)]
        month: Option<u32>,
    },
    /// Display current configuration
    Config,
    /// Start the interactive calendar (default)
    Interactive,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command(cfg: &config::Config) {
    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("mode: {}", cfg.mode.label());
    println!("scroll_step: {}", cfg.scroll_step);
    println!();
    println!("[layout]");
    println!("cell_width: {}", cfg.layout.cell_width);
    println!("cell_height: {}", cfg.layout.cell_height);
    println!("employee_column_width: {}", cfg.layout.employee_column_width);
    println!();
    println!("[grid]");
    let flag = |value: Option<bool>| value.map_or_else(|| "screen default".to_string(), |v| v.to_string());
    println!("allow_multi_select: {}", flag(cfg.grid.allow_multi_select));
    println!("allow_drag_select: {}", flag(cfg.grid.allow_drag_select));
    println!("allow_cell_editing: {}", flag(cfg.grid.allow_cell_editing));
    println!();
    println!("[theme]");
    println!("selection_fg: {}", config::format_color(cfg.theme.selection_fg));
    println!("unfocused_selection_fg: {}{}",
        config::format_color(cfg.theme.unfocused_selection_fg()),
        if cfg.theme.unfocused_selection_fg.is_none() { " (auto: 50% darker)" } else { "" }
    );
    println!("drag_preview_bg: {}", config::format_color(cfg.theme.drag_preview_bg));
    println!("error_fg: {}", config::format_color(cfg.theme.error_fg));
    let mut overrides: Vec<_> = cfg.theme.status.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    for (status, color) in overrides {
        println!("status.{}: {}", status, config::format_color(*color));
    }
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a config::Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Run the interactive calendar against the in-memory provider
async fn run_tui_mode(config: config::Config) -> tui::TuiResult<()> {
    let provider = Arc::new(FixtureProvider::new());
    tui::run(provider, config).await
}

#[tokio::main]
async fn main() {
    let mut config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    let result = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            if let Err(e) = run_tui_mode(config).await {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(1);
            }
            return;
        }
        Commands::Config => {
            handle_config_command(&config);
            return;
        }
        Commands::Holidays { year } => commands::holidays::run(year),
        Commands::Days { year, month } => commands::days::run(year, month),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
