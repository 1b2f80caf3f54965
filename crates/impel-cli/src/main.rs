// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `impel`: run built-in scenes through the deterministic stepper.
//!
//! ```text
//! impel run ground --steps 240
//! impel run collisions --count 64 --fixed --format json
//! impel --config sim.json config
//! ```
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod report;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use impel_core::{DFix64, EventLog, F32Scalar, QuadTree, Scalar, SimConfig};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::report::{BodyRow, RunSummary, Totals};
use crate::scenario::{SceneParams, Scenario};

#[derive(Parser, Debug)]
#[command(name = "impel", author, version, about = "Deterministic 2D rigid-body stepper")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with world and quadtree settings.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a scene and step it.
    Run(RunArgs),
    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scene to simulate.
    #[arg(value_enum)]
    scenario: Scenario,

    /// Number of fixed steps.
    #[arg(long, default_value_t = 240)]
    steps: u32,

    /// Step length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Use Q32.32 fixed point instead of f32.
    #[arg(long)]
    fixed: bool,

    /// Movers spawned by the random scenes.
    #[arg(long, default_value_t = 32)]
    count: usize,

    /// Seed for the random scenes.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Also print a table of final body states.
    #[arg(long)]
    bodies: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => SimConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    config.validate().context("invalid configuration")?;

    match cli.command {
        Command::Config => println!("{}", config.to_json()?),
        Command::Run(args) => {
            let summary = if args.fixed {
                run::<DFix64>(&config, &args, "fixed")?
            } else {
                run::<F32Scalar>(&config, &args, "f32")?
            };
            match args.format {
                Format::Table => {
                    println!("{}", summary.to_table());
                    if args.bodies {
                        println!("{}", summary.bodies_table());
                    }
                }
                Format::Json => println!("{}", summary.to_json()?),
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let fallback = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.as_str()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn run<S: Scalar>(config: &SimConfig, args: &RunArgs, lane: &'static str) -> Result<RunSummary> {
    let params = SceneParams { count: args.count, seed: args.seed };
    let mut world = scenario::build::<S>(args.scenario, config, params)?;
    let mut broadphase = QuadTree::<S>::new(config.quadtree)?;
    let mut log = EventLog::new();
    let dt = S::from_f32(args.dt);

    info!(steps = args.steps, dt = args.dt, lane, "running");
    let mut totals = Totals::default();
    let mut events = 0;
    let mut peak_overflow = 0;
    for tick in 0..args.steps {
        let step = world.step(dt, &mut broadphase, &mut log).with_context(|| format!("step {tick}"))?;
        totals.add(&step);
        peak_overflow = peak_overflow.max(broadphase.overflow_count());
        for event in log.drain() {
            debug!(tick, %event, "contact");
            events += 1;
        }
    }

    Ok(RunSummary {
        scenario: args.scenario,
        lane,
        steps: args.steps,
        dt: args.dt,
        bodies: world.body_count(),
        colliders: world.collider_count(),
        contacts: world.manifold_len(),
        events,
        peak_overflow,
        totals,
        state_hash: hex::encode(world.state_hash()),
        bodies_final: world.bodies().map(|(handle, body)| BodyRow::new(handle, body)).collect(),
    })
}

