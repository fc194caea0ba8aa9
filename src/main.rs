//! htsv-shorten CLI
//!
//! Cuts recorded tracking sessions down to a frame window for use as test
//! fixtures.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use htsv_shorten::{
    config::Config,
    core::smooth,
    provenance::RunLog,
    session::{format_angle, shorten_session, ShortenParams},
    VERSION,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "htsv-shorten")]
#[command(version = VERSION)]
#[command(about = "Shorten tracking sessions and smooth head direction", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten one or more session directories
    Shorten {
        /// Session directories containing frames.*.htsv files
        #[arg(default_value = ".")]
        sessions: Vec<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Smooth newline-separated angles (degrees) read from stdin
    Smooth {
        /// Gaussian width in samples
        #[arg(long)]
        sigma: Option<f64>,
    },

    /// Show configuration
    Config {
        #[command(flatten)]
        overrides: Overrides,

        /// Persist the effective configuration
        #[arg(long)]
        save: bool,
    },
}

/// Command-line overrides for configured values.
#[derive(Args)]
struct Overrides {
    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// First frame of the window
    #[arg(long)]
    start_frame: Option<usize>,

    /// Number of frames in the window
    #[arg(long)]
    n_frames: Option<usize>,

    /// Gaussian width (in frames) for head-direction smoothing
    #[arg(long)]
    sigma: Option<f64>,

    /// Name of the angular column to smooth
    #[arg(long)]
    angle_column: Option<String>,

    /// Do not write the leading row-index column
    #[arg(long)]
    no_index: bool,

    /// Do not write short.manifest.json
    #[arg(long)]
    no_manifest: bool,
}

impl Overrides {
    /// Load the configuration file and apply these overrides on top.
    fn resolve(&self) -> anyhow::Result<Config> {
        let path = Config::resolve_path(self.config.as_deref());
        let mut config = Config::load_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?;

        if let Some(start) = self.start_frame {
            config.start_frame = start;
        }
        if let Some(n) = self.n_frames {
            config.n_frames = n;
        }
        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(ref column) = self.angle_column {
            config.angle_column = column.clone();
        }
        if self.no_index {
            config.write_index = false;
        }
        if self.no_manifest {
            config.write_manifest = false;
        }

        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Shorten {
            sessions,
            overrides,
        } => cmd_shorten(&sessions, &overrides),
        Commands::Smooth { sigma } => cmd_smooth(sigma),
        Commands::Config { overrides, save } => cmd_config(&overrides, save),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_shorten(sessions: &[PathBuf], overrides: &Overrides) -> anyhow::Result<()> {
    let config = overrides.resolve()?;
    let params = ShortenParams::from_config(&config).context("invalid parameters")?;

    println!("htsv-shorten v{VERSION}");
    println!(
        "  Window: frames {}..{} ({} frames)",
        params.window.start,
        params.window.end(),
        params.window.length
    );
    println!("  Sigma: {}", params.sigma);
    println!("  Angle column: {}", params.angle_column);
    println!();

    let mut log = RunLog::new();

    for dir in sessions {
        match shorten_session(dir, &params) {
            Ok(outcome) => {
                print_outcome(dir, &outcome);
                log.record_session(outcome.rows_read(), outcome.rows_written());
            }
            Err(e) => {
                eprintln!("Error shortening {}: {e}", dir.display());
                log.record_failure();
            }
        }
    }

    println!();
    println!("{}", log.summary());

    if log.has_failures() {
        bail!("{} session(s) failed", log.stats().sessions_failed);
    }
    Ok(())
}

fn print_outcome(dir: &Path, outcome: &htsv_shorten::SessionOutcome) {
    println!("Saved out shortened data for {}", dir.display());
    for table in &outcome.manifest.tables {
        println!(
            "  {}: {} of {} rows -> {}",
            table.role, table.output_rows, table.source_rows, table.output
        );
    }
}

fn cmd_smooth(sigma: Option<f64>) -> anyhow::Result<()> {
    let sigma = match sigma {
        Some(s) => s,
        None => Config::load().context("loading config")?.sigma,
    };

    let stdin = std::io::stdin();
    let mut angles = Vec::new();
    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let angle: f64 = trimmed
            .parse()
            .with_context(|| format!("line {}: not a number: {trimmed:?}", line_no + 1))?;
        angles.push(angle);
    }

    let smoothed = smooth(&angles, sigma)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for value in smoothed {
        writeln!(out, "{}", format_angle(value))?;
    }
    Ok(())
}

fn cmd_config(overrides: &Overrides, save: bool) -> anyhow::Result<()> {
    let config = overrides.resolve()?;
    config.validate().context("invalid configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    let path = Config::resolve_path(overrides.config.as_deref());
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    if save {
        config
            .save_to(&path)
            .with_context(|| format!("saving config to {}", path.display()))?;
        println!();
        println!("Saved to {path:?}");
    }
    Ok(())
}
