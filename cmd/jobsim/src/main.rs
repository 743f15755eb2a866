//! `jobsim` — run the discrete-event worker-pool simulator from the
//! command line: load (or default) a configuration, obtain a job
//! stream (generated or replayed from a scenario file), run the
//! kernel to completion, and print a statistics report.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use jobsim_core::{Configuration, Job};
use jobsim_runtime::{JobGenerator, Kernel, Statistics};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DebugLevel {
    Off,
    Debug,
    Trace,
    /// Kept distinct from `Trace` for CLI compatibility with the
    /// original tool's verbosity levels; maps to the same log filter.
    Full,
}

impl From<DebugLevel> for log::LevelFilter {
    fn from(level: DebugLevel) -> Self {
        match level {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace | DebugLevel::Full => log::LevelFilter::Trace,
        }
    }
}

/// Run the jobsim discrete-event worker-pool simulator.
#[derive(Debug, Parser)]
#[command(name = "jobsim", version, about)]
struct Cli {
    /// Simulation time window, in H:M:S (e.g. 1:00:00 for one hour).
    #[arg(value_parser = parse_duration_hms)]
    duration: i64,

    /// Load simulation configuration from a JSON file.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay a fixed job scenario from a JSON file instead of generating one.
    #[arg(long, short = 's', value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Write the generated (or replayed) scenario out as JSON before running.
    #[arg(long, value_name = "FILE")]
    dump_scenario: Option<PathBuf>,

    /// Debug verbosity.
    #[arg(long, value_enum, default_value = "off")]
    debug: DebugLevel,

    /// A name for this run, included in the report header.
    #[arg(long)]
    name: Option<String>,

    /// Number of histogram bins.
    #[arg(long, default_value_t = 10)]
    bins: usize,

    /// RNG seed for the job generator (ignored when --scenario is given).
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_duration_hms(value: &str) -> std::result::Result<i64, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [h, m, s] = parts.as_slice() else {
        return Err("duration must be in H:M:S format".to_string());
    };
    let hours: i64 = h.parse().map_err(|_| "duration components must be integers".to_string())?;
    let minutes: i64 = m.parse().map_err(|_| "duration components must be integers".to_string())?;
    let seconds: i64 = s.parse().map_err(|_| "duration components must be integers".to_string())?;
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err("duration must satisfy H>=0, 0<=M<60, 0<=S<60".to_string());
    }
    Ok(hours * HOUR + minutes * MINUTE + seconds)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new().filter_level(cli.debug.into()).init();

    let config = match &cli.config {
        Some(path) => Configuration::load(path).with_context(|| format!("loading configuration from '{}'", path.display()))?,
        None => Configuration::default_config(),
    };

    let jobs: Vec<Job> = match &cli.scenario {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading scenario file '{}'", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing scenario file '{}'", path.display()))?
        }
        None => JobGenerator::new(&config, cli.seed).generate_jobs(0, cli.duration),
    };

    if let Some(path) = &cli.dump_scenario {
        let json = serde_json::to_string_pretty(&jobs)?;
        fs::write(path, json).with_context(|| format!("writing scenario file '{}'", path.display()))?;
        log::info!("wrote {} jobs to '{}'", jobs.len(), path.display());
    }

    if let Some(name) = &cli.name {
        println!("Run: {name}");
    }
    println!("Jobs submitted: {}", jobs.len());

    let kernel = Kernel::new(&config);
    let completed = kernel.run(&config, jobs);

    match Statistics::compute(&completed, &config, cli.bins) {
        Some(stats) => println!("\n{stats}"),
        None => println!("\nNo jobs completed; nothing to report."),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_duration() {
        assert_eq!(parse_duration_hms("1:30:00").unwrap(), HOUR + 30 * MINUTE);
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(parse_duration_hms("0:60:00").is_err());
        assert!(parse_duration_hms("0:00:60").is_err());
        assert!(parse_duration_hms("-1:00:00").is_err());
    }

    #[test]
    fn rejects_malformed_duration() {
        assert!(parse_duration_hms("1:30").is_err());
        assert!(parse_duration_hms("a:b:c").is_err());
    }
}
