//! Command-line driver for the n-body simulation.
//!
//! Runs the simulation sequentially or on one of the executor's scheduling
//! disciplines and reports the total and per-iteration wall time.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use dequepool::nbody::{self, Config, Mode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MIN_BODIES: usize = 2000;
const MIN_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Sequential
    #[value(name = "s")]
    Sequential,
    /// Work-stealing
    #[value(name = "ws")]
    WorkStealing,
    /// Work-balancing
    #[value(name = "wb")]
    WorkBalancing,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Sequential => Mode::Sequential,
            ModeArg::WorkStealing => Mode::WorkStealing,
            ModeArg::WorkBalancing => Mode::WorkBalancing,
        }
    }
}

/// N-body simulation scheduled by a work-stealing or work-balancing executor.
#[derive(Parser, Debug)]
#[command(name = "nbody", version, about, long_about = None)]
struct Cli {
    /// Scheduling mode: s (sequential), ws (work-stealing) or wb (work-balancing)
    #[arg(short = 'm', long, value_enum, default_value = "s")]
    mode: ModeArg,

    /// Number of bodies (at least 2000)
    #[arg(short = 'n', long, default_value_t = 10_000)]
    bodies: usize,

    /// Number of time steps (at least 10)
    #[arg(short = 'i', long, default_value_t = 100)]
    iterations: usize,

    /// Record body positions to this CSV file
    #[arg(short = 'r', long)]
    record: Option<PathBuf>,

    /// Number of worker threads for the parallel modes
    #[arg(short = 't', long, default_value_t = 8)]
    threads: usize,

    /// Print the configuration before running
    #[arg(short = 'p', long)]
    print_config: bool,

    /// Seed for the initial body positions
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        if self.bodies < MIN_BODIES {
            bail!("minimum number of bodies is {MIN_BODIES}, got {}", self.bodies);
        }
        if self.iterations < MIN_ITERATIONS {
            bail!(
                "minimum number of iterations is {MIN_ITERATIONS}, got {}",
                self.iterations
            );
        }
        Ok(Config {
            mode: self.mode.into(),
            bodies: self.bodies,
            iterations: self.iterations,
            threads: self.threads,
            record: self.record.clone(),
            seed: self.seed,
        })
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}

fn print_config(config: &Config) {
    println!("\nRUNNING N-BODY SIMULATION WITH CONFIGURATION:");
    println!("---------------------------------------------");
    println!("MODE                : {:?}", config.mode);
    println!("NUMBER OF BODIES    : {}", config.bodies);
    println!("NUMBER OF TIMESTEPS : {}", config.iterations);
    match &config.record {
        Some(path) => println!("RECORD POSITIONS    : {}", path.display()),
        None => println!("RECORD POSITIONS    : no"),
    }
    if config.mode != Mode::Sequential {
        println!("NUMBER OF THREADS   : {}", config.threads);
    }
    println!("---------------------------------------------");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config()?;
    if cli.print_config {
        print_config(&config);
    }

    let start = Instant::now();
    nbody::run(&config)?;
    let total = start.elapsed().as_secs_f64();

    println!(
        "TOTAL TIME: {:.5}s, AVG TIME: {:.5}s",
        total,
        total / config.iterations as f64
    );
    Ok(())
}
