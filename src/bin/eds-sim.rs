//! eds-sim: run the EDS guideway pipeline and export the sampled quantities.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eds_maglev::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "eds-sim")]
#[command(about = "Simulate induced guideway current and feedback energy for a passing EDS train")]
#[command(version)]
struct Args {
    /// JSON parameter file (missing fields take the reference defaults)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Train speed in m/s
    #[arg(long)]
    speed: Option<f64>,

    /// Guideway circuit resistance in ohms
    #[arg(long)]
    resistance: Option<f64>,

    /// Simulated window in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Sample spacing in seconds
    #[arg(long)]
    time_step: Option<f64>,

    /// Train lateral offset in meters
    #[arg(long)]
    lateral_offset: Option<f64>,

    /// Wind both guideway loops in the same sense instead of figure-eight
    #[arg(long)]
    common_winding: bool,

    /// Lateral displacement used to differentiate the energy, in meters
    #[arg(long, default_value_t = DEFAULT_FORCE_DISPLACEMENT)]
    force_displacement: f64,

    /// Comma-separated lateral offsets; runs a sweep and prints JSON instead of CSV
    #[arg(long, value_delimiter = ',')]
    sweep: Option<Vec<f64>>,
}

fn load_builder(args: &Args) -> Result<SimulationParametersBuilder> {
    let mut builder = match &args.params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read parameter file: {:?}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse parameter file: {:?}", path))?
        }
        None => SimulationParameters::builder(),
    };

    if let Some(v) = args.speed {
        builder = builder.speed(v);
    }
    if let Some(r) = args.resistance {
        builder = builder.resistance(r);
    }
    if let Some(d) = args.duration {
        builder = builder.duration(d);
    }
    if let Some(dt) = args.time_step {
        builder = builder.time_step(dt);
    }
    if let Some(y) = args.lateral_offset {
        builder = builder.train_lateral_offset(y);
    }
    if args.common_winding {
        builder = builder.winding(WindingMode::Common);
    }
    Ok(builder)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let params = load_builder(&args)?.build().context("Invalid simulation parameters")?;
    info!(
        samples = params.sample_count(),
        speed = params.speed(),
        resistance = params.resistance(),
        "parameters loaded"
    );

    if let Some(offsets) = &args.sweep {
        let points = lateral_offset_sweep(&params, offsets, args.force_displacement)
            .context("Lateral sweep failed")?;
        let json = serde_json::to_string_pretty(&points)?;
        match &args.output {
            Some(path) => fs::write(path, json)
                .with_context(|| format!("Failed to write sweep output: {:?}", path))?,
            None => println!("{json}"),
        }
        return Ok(());
    }

    let pipeline = EdsPipeline::new(params)
        .with_force_displacement(args.force_displacement)
        .context("Invalid force displacement")?;
    let result = pipeline.run();

    match &args.output {
        Some(path) => {
            save_result_csv(path, &result)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Wrote {} samples to {:?}", result.grid.len(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_result_csv(&mut lock, &result)?;
            lock.flush()?;
        }
    }

    Ok(())
}
