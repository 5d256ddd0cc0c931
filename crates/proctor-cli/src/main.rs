use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proctor_core::ProctorConfig;
use tracing_subscriber::EnvFilter;

mod inspect;
mod recording;
mod replay;

#[derive(Parser)]
#[command(name = "proctor")]
#[command(about = "Replay and inspect recorded landmark feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a recording through the detector and print alerts and counters
    Replay {
        path: PathBuf,
        /// Detector config (TOML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Frame rate assumed for records without a timestamp
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print per-frame visibility, features and head pose
    Inspect {
        path: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
    },
    /// Print the default detector config as TOML
    Defaults,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            path,
            config,
            fps,
            json,
        } => {
            let config = recording::load_config(config.as_deref())?;
            let rec = recording::open(&path, fps)?;
            if rec.malformed > 0 {
                eprintln!("warning: skipped {} malformed line(s)", rec.malformed);
            }
            let report = replay::replay(config, &rec.frames)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                replay::print_report(&report);
            }
        }
        Command::Inspect { path, config, fps } => {
            let config = recording::load_config(config.as_deref())?;
            let rec = recording::open(&path, fps)?;
            for row in inspect::inspect(config, &rec.frames)? {
                println!("{row}");
            }
        }
        Command::Defaults => {
            let text = toml::to_string(&ProctorConfig::default())
                .context("failed to serialize default config")?;
            print!("{text}");
        }
    }

    Ok(())
}
