//! guess-duel CLI
//!
//! Play the guessing game in the terminal, or let the computer play many
//! games against itself and report how many rounds it needs.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use guess_duel::config::{self, Config};
use guess_duel::report::format_report;
use guess_duel::simulate::{assemble_report, simulate, simulate_game};
use guess_duel::tui::{self, App};
use guess_duel::types::{OutputFormat, SimulationConfig, SimulationReport};

#[derive(Parser)]
#[command(name = "guess-duel")]
#[command(about = "Pick a number and let the computer guess it")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/guess-duel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. "guess_duel=debug" (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Seed the opponent for a reproducible game
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let a truthful oracle play many games and report round statistics
    Simulate {
        /// Number of games
        #[arg(long, default_value_t = 1000)]
        games: usize,

        /// Use this secret for every game (default: random per game)
        #[arg(long)]
        secret: Option<u32>,

        /// Base seed; game i uses seed + i
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file path if none exists yet
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match (&cli.command, cli.config.as_deref()) {
        // `config --init --config <new file>`: nothing to load yet
        (Commands::Config { init: true }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => config::load(path).map_err(|e| e.to_string())?,
    };

    let level = cli.log_level.as_deref().unwrap_or(config.log.level.as_str());
    let interactive = matches!(cli.command, Commands::Play { .. });
    init_logging(level, config.log.file.as_deref(), interactive)?;

    match cli.command {
        Commands::Play { seed } => cmd_play(&config, seed),
        Commands::Simulate {
            games,
            secret,
            seed,
            format,
        } => cmd_simulate(&config, games, secret, seed, format.into()),
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), init),
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `level`. Logs go to `file` when set; otherwise to
/// stderr, except in interactive mode where they would garble the screen.
fn init_logging(level: &str, file: Option<&Path>, interactive: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("Invalid log filter {:?}: {}", level, e))?;

    match file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Cannot open log file {}: {}", path.display(), e))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .init();
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_play(config: &Config, seed: Option<u64>) -> Result<(), String> {
    let app = App::new(config.bounds(), config.session_options(), seed);
    tui::run(app).map_err(|e| format!("Terminal error: {}", e))
}

fn cmd_simulate(
    config: &Config,
    games: usize,
    secret: Option<u32>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), String> {
    if let Some(value) = secret {
        if !config.bounds().contains(value) {
            return Err(format!(
                "Secret {} is outside the playable range {}-{}",
                value,
                config.game.low,
                config.bounds().max_secret()
            ));
        }
    }

    let sim = SimulationConfig {
        bounds: config.bounds(),
        options: config.session_options(),
        games,
        secret,
        seed,
    };

    let report = if format == OutputFormat::Human {
        eprintln!(
            "Simulating {} games over {}-{}...",
            games,
            config.game.low,
            config.bounds().max_secret()
        );
        simulate_with_progress(&sim)
    } else {
        simulate(&sim)
    };

    print!("{}", format_report(&report, format));

    if report.games_played == 0 && games > 0 {
        return Err("No game finished".to_string());
    }
    Ok(())
}

/// Run the simulation with a progress bar (parallel games).
fn simulate_with_progress(sim: &SimulationConfig) -> SimulationReport {
    let pb = progress_bar(sim.games as u64, "Playing...");

    let results: Vec<_> = (0..sim.games)
        .into_par_iter()
        .progress_with(pb.clone())
        .map(|i| (i, simulate_game(sim, i)))
        .collect();

    pb.finish_with_message("Done");

    assemble_report(results)
}

fn cmd_config(config: &Config, explicit: Option<&Path>, init: bool) -> Result<(), String> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::default_config_path().map_err(|e| e.to_string())?,
    };

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            config::create_default_config(&path, config).map_err(|e| e.to_string())?;
            println!("Created: {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", config::to_toml(config));
    Ok(())
}
