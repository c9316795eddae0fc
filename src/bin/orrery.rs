//! Orrery headless driver
//!
//! Runs one of the orbit models for a number of frames and prints body
//! positions, either as an aligned table or as one JSON object per frame.
//!
//! Usage:
//!   cargo run --bin orrery -- kepler --preset full --frames 100 --every 10
//!   cargo run --bin orrery -- nbody --frames 365 --format json

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orrery::kepler::{KeplerConfig, KeplerModel};
use orrery::nbody::NBodyConfig;
use orrery::presets;
use orrery::view::{DisplayLayout, Viewport};
use orrery::{FramePositions, PositionProvider};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Simplified solar system driver
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prints body positions from the Keplerian or N-body solar system models",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    model: Model,

    /// Number of frames to compute
    #[arg(short, long, default_value_t = 100, global = true)]
    frames: u64,

    /// Print every Nth frame
    #[arg(short, long, default_value_t = 1, global = true)]
    every: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Model {
    /// Planets on fixed ellipses, moons on fixed circles
    Kepler {
        /// Body table to animate
        #[arg(short, long, value_enum, default_value_t = Preset::Inner)]
        preset: Preset,

        /// Simulated time per frame
        #[arg(long, default_value_t = orrery::constants::KEPLER_TIME_STEP)]
        time_step: f64,
    },
    /// Pairwise Newtonian gravity with one-day Euler steps
    Nbody {
        /// Keep at most this many trail points per body
        #[arg(long)]
        trail_cap: Option<usize>,

        /// Zoom steps applied to the viewport (negative zooms out)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        zoom: i32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Inner,
    Full,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Table,
    Json,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Prints one frame in the requested format
fn print_frame(frame: &FramePositions, format: Format, pixels: Option<&Viewport>) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(frame)?),
        Format::Table => {
            print_section_header(&format!("Frame {} (t = {:.4})", frame.frame, frame.time));
            for body in frame.iter() {
                match pixels {
                    Some(view) => {
                        let (px, py) = view.to_screen(body.point());
                        println!(
                            "{:<10} {:>16.6e} {:>16.6e}   [{:>5}, {:>5}] px",
                            body.name, body.x, body.y, px, py
                        );
                    }
                    None => println!("{:<10} {:>12.6} {:>12.6}", body.name, body.x, body.y),
                }
            }
        }
    }
    Ok(())
}

/// Advances a model and prints the selected frames
fn run(
    provider: &mut dyn PositionProvider,
    args: &Args,
    pixels: Option<&Viewport>,
) -> Result<()> {
    let every = args.every.max(1);
    for index in 0..args.frames {
        let frame = provider.advance()?;
        if index % every == 0 {
            print_frame(&frame, args.format, pixels)?;
        }
    }
    Ok(())
}

fn run_kepler(preset: Preset, time_step: f64, args: &Args) -> Result<()> {
    let bodies = match preset {
        Preset::Inner => presets::inner_solar_system_bodies()?,
        Preset::Full => presets::full_solar_system_bodies()?,
    };
    let mut model = KeplerModel::new(bodies, KeplerConfig::new().with_time_step(time_step))?;
    let layout = DisplayLayout::for_model(&model)?;
    info!(
        "Keplerian model with {} bodies, axis limit {:.2} AU",
        model.bodies().len(),
        layout.axis_limit
    );

    if args.format == Format::Table {
        print_section_header("Bodies");
        for (_, body) in model.bodies().iter() {
            println!(
                "{:<10} color {}  marker {:>6.2}",
                body.name,
                body.color,
                layout.marker_size(body)
            );
        }
    }

    run(&mut model, args, None)
}

fn run_nbody(trail_cap: Option<usize>, zoom: i32, args: &Args) -> Result<()> {
    let config = match trail_cap {
        Some(capacity) => NBodyConfig::new().with_trail_capacity(capacity),
        None => NBodyConfig::new(),
    };
    let mut system = presets::nbody_solar_system(config)?;

    let mut view = Viewport::default();
    for _ in 0..zoom.unsigned_abs() {
        if zoom > 0 {
            view.zoom_in();
        } else {
            view.zoom_out();
        }
    }
    info!(
        "N-body model with {} bodies, zoom {:.3}",
        system.bodies().len(),
        view.zoom
    );

    run(&mut system, args, Some(&view))?;

    let longest = system
        .bodies()
        .iter()
        .map(|(_, body)| body.trail().len())
        .max()
        .unwrap_or(0);
    info!(
        "{} ticks, {:.1} days simulated, longest trail {} points",
        system.ticks(),
        system.elapsed_s() / orrery::constants::DAY_S,
        longest
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match &args.model {
        Model::Kepler { preset, time_step } => run_kepler(*preset, *time_step, &args),
        Model::Nbody { trail_cap, zoom } => run_nbody(*trail_cap, *zoom, &args),
    }
}
