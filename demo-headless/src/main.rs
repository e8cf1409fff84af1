//! Headless heat diffusion demo
//!
//! Builds a named scenario, advances the solver step by step, and writes
//! color-mapped frames as binary PPM files on a fixed cadence: the
//! render-sink/screenshot role of a host, without a window.

use clap::Parser;
use heatfield_core::{
    DiffusionField, PixelMap, RenderConfig, Rgb, SimulationParams, SourceMaps,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Cold background temperature seeded outside the warm shapes.
const COLD_TEMPERATURE: f64 = 100.0;
/// Peak temperature of the warm shapes.
const WARM_TEMPERATURE: f64 = 10_000.0;

/// Heat diffusion demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "heatfield-demo")]
#[command(about = "2D heat diffusion demo", long_about = None)]
struct Args {
    /// Scenario preset (gradient, round, half-round, hotspots, walled)
    #[arg(short, long, default_value = "round")]
    scenario: String,

    /// Grid width in cells
    #[arg(long, default_value_t = 200)]
    width: u32,

    /// Grid height in cells
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Number of diffusion steps to run
    #[arg(short = 'n', long, default_value_t = 2000)]
    steps: u32,

    /// Steps between rendered frames (0 = only the final frame)
    #[arg(short, long, default_value_t = 500)]
    render_interval: u32,

    /// Pixel zoom factor for rendered frames
    #[arg(short, long, default_value_t = 1)]
    zoom: u32,

    /// Leave a 1-pixel grid gap between zoomed cells
    #[arg(long)]
    grid: bool,

    /// Border temperature pinned before every step
    #[arg(short, long, default_value_t = 1.0)]
    border_temperature: f64,

    /// Output directory for PPM frames
    #[arg(short, long, default_value = "frames")]
    out_dir: PathBuf,

    /// RNG seed for the hotspots scenario
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

type ScenarioBuilder = fn(&Args, SimulationParams) -> DiffusionField;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut registry: FxHashMap<&'static str, ScenarioBuilder> = FxHashMap::default();
    registry.insert("gradient", build_gradient);
    registry.insert("round", build_round);
    registry.insert("half-round", build_half_round);
    registry.insert("hotspots", build_hotspots);
    registry.insert("walled", build_walled);

    let Some(builder) = registry.get(args.scenario.as_str()) else {
        let mut names: Vec<&str> = registry.keys().copied().collect();
        names.sort_unstable();
        eprintln!(
            "unknown scenario '{}'; available: {}",
            args.scenario,
            names.join(", ")
        );
        std::process::exit(1);
    };

    let params = SimulationParams {
        border_temperature: args.border_temperature,
        ..SimulationParams::default()
    };
    let field = builder(&args, params);

    if let Err(e) = run(&args, field) {
        eprintln!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args, mut field: DiffusionField) -> io::Result<()> {
    println!("=== Heat Diffusion Demo ===\n");
    println!(
        "Scenario '{}' on a {}x{} grid, {} steps",
        args.scenario,
        field.width(),
        field.height(),
        args.steps
    );

    let factor = field.params().stability_factor(field.max_conductivity());
    if factor > SimulationParams::STABILITY_LIMIT {
        warn!(
            "stability factor {factor:.3} exceeds {}; the scheme will diverge",
            SimulationParams::STABILITY_LIMIT
        );
    }

    fs::create_dir_all(&args.out_dir)?;
    let cfg = RenderConfig::default();
    let mut frame_index = 0_u32;

    for step in 1..=args.steps {
        // The step never re-pins, so the boundary is re-applied each
        // iteration to keep it fixed.
        field.set_wall_conditions(args.border_temperature);
        field.step();

        if args.render_interval > 0 && step % args.render_interval == 0 {
            let frame = field.render(&cfg, args.zoom, args.grid);
            let path = args.out_dir.join(format!("frame_{frame_index:04}.ppm"));
            write_ppm(&path, &frame)?;
            frame_index += 1;

            let stats = field.stats();
            info!(
                "step {step}: min={:.2} max={:.2} mean={:.2}",
                stats.min, stats.max, stats.mean
            );
        }
    }

    let frame = field.render(&cfg, args.zoom, args.grid);
    let final_path = args.out_dir.join("final.ppm");
    write_ppm(&final_path, &frame)?;

    let stats = field.stats();
    println!("\nFinished after {} steps", args.steps);
    println!(
        "Temperature: min={:.2} max={:.2} mean={:.2}",
        stats.min, stats.max, stats.mean
    );
    println!(
        "Wrote {} interval frame(s) and {}",
        frame_index,
        final_path.display()
    );
    Ok(())
}

/// Radial gradient: warm at the field center, cooling linearly toward the
/// corners.
fn build_gradient(args: &Args, params: SimulationParams) -> DiffusionField {
    let cx = f64::from(args.width) / 2.0;
    let cy = f64::from(args.height) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();

    DiffusionField::procedural(args.width, args.height, params, move |x, y| {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        let dist = (dx * dx + dy * dy).sqrt();
        COLD_TEMPERATURE + (WARM_TEMPERATURE - COLD_TEMPERATURE) * (1.0 - dist / max_dist)
    })
}

/// Warm disc on a cold background.
fn build_round(args: &Args, params: SimulationParams) -> DiffusionField {
    let cx = f64::from(args.width) / 2.0;
    let cy = f64::from(args.height) / 2.0;
    let radius = f64::from(args.width.min(args.height)) / 6.0;

    DiffusionField::procedural(args.width, args.height, params, move |x, y| {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        if dx * dx + dy * dy < radius * radius {
            WARM_TEMPERATURE
        } else {
            COLD_TEMPERATURE
        }
    })
}

/// Warm disc clipped to the right half-plane.
fn build_half_round(args: &Args, params: SimulationParams) -> DiffusionField {
    let cx = f64::from(args.width) / 2.0;
    let cy = f64::from(args.height) / 2.0;
    let radius = f64::from(args.width.min(args.height)) / 6.0;

    DiffusionField::procedural(args.width, args.height, params, move |x, y| {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        if dx * dx + dy * dy < radius * radius && f64::from(x) >= cx {
            WARM_TEMPERATURE
        } else {
            COLD_TEMPERATURE
        }
    })
}

/// Warm discs scattered at seeded random positions.
fn build_hotspots(args: &Args, params: SimulationParams) -> DiffusionField {
    let mut field =
        DiffusionField::procedural(args.width, args.height, params, |_, _| COLD_TEMPERATURE);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let radius = (args.width.min(args.height) / 10).max(2);
    for _ in 0..6 {
        let x = rng.random_range(0..args.width);
        let y = rng.random_range(0..args.height);
        field.adjust_temperature(x, y, radius, WARM_TEMPERATURE);
    }
    field
}

/// Map-driven scenario built from in-memory pixel maps: a vertical wall with
/// a heat-fixing gap in the middle and conductivity falling off to the
/// right, seeded warm on the left.
fn build_walled(args: &Args, params: SimulationParams) -> DiffusionField {
    let (w, h) = (args.width, args.height);

    let mut classification = PixelMap::filled(w, h, Rgb::new(255, 255, 255));
    let wall_x = w / 2;
    let third = h / 3;
    for y in 1..h - 1 {
        if y > third && y < 2 * third {
            classification.put(wall_x, y, Rgb::RED);
        } else {
            classification.put(wall_x, y, Rgb::BLACK);
        }
    }

    let mut conductivity = PixelMap::filled(w, h, Rgb::RED);
    for y in 0..h {
        for x in 0..w {
            let ramp = (u64::from(x) * 200 / u64::from(w)) as u8;
            conductivity.put(x, y, Rgb::new(255 - ramp, 0, 0));
        }
    }

    let maps = SourceMaps {
        classification,
        conductivity,
        base: None,
    };

    let warm_side = w / 3;
    let fill = move |x: u32, _y: u32| {
        if x < warm_side {
            WARM_TEMPERATURE
        } else {
            COLD_TEMPERATURE
        }
    };
    DiffusionField::from_maps(&maps, params, Some(&fill))
}

/// Write a pixel map as a binary PPM (P6) file.
fn write_ppm(path: &Path, map: &PixelMap) -> io::Result<()> {
    let mut data = Vec::with_capacity(map.pixels().len() * 3 + 32);
    data.extend_from_slice(format!("P6\n{} {}\n255\n", map.width(), map.height()).as_bytes());
    for pixel in map.pixels() {
        data.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
    }
    fs::write(path, data)
}
