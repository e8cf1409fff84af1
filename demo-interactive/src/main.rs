//! Interactive Heat Diffusion Demo
//!
//! A terminal command loop that drives the core's editor-tick primitive.
//! Each typed command becomes an input snapshot, exactly as a
//! pointer-and-keys host would assemble one per polling tick.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n]` - Advance the simulation by n steps (default 1)
//! - `paint <x> <y>` - Apply the brush at the given cell
//! - `+` / `-` - Raise / lower the brush delta by one step
//! - `brush` - Show the current brush radius and delta
//! - `probe <x> <y>` - Show temperature, classification and conductivity
//! - `render` - Write the current field as edit.ppm
//! - `status` - Show field statistics
//! - `reset <width> <height>` - Rebuild the field with new dimensions
//! - `help` - Show available commands
//! - `quit` - Exit the editor

use heatfield_core::{
    DiffusionField, EditorSession, FieldStats, InputSnapshot, PixelMap, RenderConfig,
    SimulationParams,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::io;
use std::path::Path;

/// Default grid dimensions
const DEFAULT_WIDTH: u32 = 150;
const DEFAULT_HEIGHT: u32 = 150;

/// Editor brush defaults.
const BRUSH_RADIUS: u32 = 25;
const BRUSH_DELTA: f64 = 50.0;

const COLD_TEMPERATURE: f64 = 100.0;
const WARM_TEMPERATURE: f64 = 10_000.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Heat Diffusion - Interactive Editor ===");
    println!();

    let mut field = create_field(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let mut session = EditorSession::new(BRUSH_RADIUS, BRUSH_DELTA, 1);
    let render_cfg = RenderConfig::default();

    println!(
        "Created a {}x{} warm-disc field.",
        field.width(),
        field.height()
    );

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("heat> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_simulation(&mut field, count);
                    }
                    "paint" | "p" => {
                        if let (Some(x), Some(y)) = (
                            parts.get(1).and_then(|s| s.parse::<u32>().ok()),
                            parts.get(2).and_then(|s| s.parse::<u32>().ok()),
                        ) {
                            let snapshot = InputSnapshot {
                                pointer_x: x,
                                pointer_y: y,
                                paint: true,
                                ..InputSnapshot::default()
                            };
                            session.tick(&mut field, &snapshot);
                            println!(
                                "Painted at ({}, {}) with radius {} delta {:.1}",
                                x,
                                y,
                                session.brush_radius(),
                                session.brush_delta()
                            );
                        } else {
                            println!("Usage: paint <x> <y>");
                        }
                    }
                    "+" => {
                        session.tick(
                            &mut field,
                            &InputSnapshot {
                                raise_delta: true,
                                ..InputSnapshot::default()
                            },
                        );
                        println!("DELTA == {:.3}", session.brush_delta());
                    }
                    "-" => {
                        session.tick(
                            &mut field,
                            &InputSnapshot {
                                lower_delta: true,
                                ..InputSnapshot::default()
                            },
                        );
                        println!("DELTA == {:.3}", session.brush_delta());
                    }
                    "brush" | "b" => {
                        println!(
                            "Brush: radius {} delta {:.3}",
                            session.brush_radius(),
                            session.brush_delta()
                        );
                    }
                    "probe" | "pr" => {
                        if let (Some(x), Some(y)) = (
                            parts.get(1).and_then(|s| s.parse::<u32>().ok()),
                            parts.get(2).and_then(|s| s.parse::<u32>().ok()),
                        ) {
                            show_probe(&field, x, y);
                        } else {
                            println!("Usage: probe <x> <y>");
                        }
                    }
                    "render" | "r" => {
                        let outcome = session.tick(
                            &mut field,
                            &InputSnapshot {
                                refresh: true,
                                ..InputSnapshot::default()
                            },
                        );
                        if outcome.render_requested {
                            match render_to_file(&field, &render_cfg) {
                                Ok(()) => println!("Wrote edit.ppm"),
                                Err(e) => eprintln!("Render failed: {}", e),
                            }
                        }
                    }
                    "status" | "st" => show_status(&field),
                    "reset" => {
                        if let (Some(width), Some(height)) = (
                            parts.get(1).and_then(|s| s.parse::<u32>().ok()),
                            parts.get(2).and_then(|s| s.parse::<u32>().ok()),
                        ) {
                            if width > 2 && height > 2 {
                                field = create_field(width, height);
                                println!("Reset to a {}x{} field.", width, height);
                            } else {
                                println!("Dimensions must be at least 3x3.");
                            }
                        } else {
                            println!("Usage: reset <width> <height>");
                        }
                    }
                    "help" | "h" => show_help(),
                    "quit" | "q" | "exit" => {
                        let outcome = session.tick(
                            &mut field,
                            &InputSnapshot {
                                exit: true,
                                ..InputSnapshot::default()
                            },
                        );
                        if outcome.exited {
                            println!("Bye.");
                            break;
                        }
                    }
                    other => {
                        println!(
                            "Unknown command '{}'. Type 'help' for available commands.",
                            other
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Readline error: {}", e);
                break;
            }
        }
    }
}

/// Warm disc on a cold background.
fn create_field(width: u32, height: u32) -> DiffusionField {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let radius = f64::from(width.min(height)) / 6.0;

    DiffusionField::procedural(
        width,
        height,
        SimulationParams::default(),
        move |x, y| {
            let dx = f64::from(x) - cx;
            let dy = f64::from(y) - cy;
            if dx * dx + dy * dy < radius * radius {
                WARM_TEMPERATURE
            } else {
                COLD_TEMPERATURE
            }
        },
    )
}

fn step_simulation(field: &mut DiffusionField, count: u32) {
    let border = field.params().border_temperature;
    for _ in 0..count {
        field.set_wall_conditions(border);
        field.step();
    }
    let stats = field.stats();
    println!(
        "Advanced {} step(s): min={:.2} max={:.2} mean={:.2}",
        count, stats.min, stats.max, stats.mean
    );
}

fn show_probe(field: &DiffusionField, x: u32, y: u32) {
    if let (Some(temperature), Some(tile), Some(conductivity)) = (
        field.temperature_at(x, y),
        field.tile_at(x, y),
        field.conductivity_at(x, y),
    ) {
        println!(
            "T[{:02}][{:02}] == {:.2}  ({:?}, conductivity {:.3})",
            x, y, temperature, tile, conductivity
        );
    } else {
        println!(
            "({}, {}) is outside the {}x{} field",
            x,
            y,
            field.width(),
            field.height()
        );
    }
}

fn show_status(field: &DiffusionField) {
    let FieldStats { min, max, mean } = field.stats();
    println!("Field: {}x{}", field.width(), field.height());
    println!("Temperature: min={:.2} max={:.2} mean={:.2}", min, max, mean);
    println!(
        "Stability factor: {:.3} (limit {})",
        field.params().stability_factor(field.max_conductivity()),
        SimulationParams::STABILITY_LIMIT
    );
}

fn show_help() {
    println!("Commands:");
    println!("  step [n]             Advance the simulation by n steps (default 1)");
    println!("  paint <x> <y>        Apply the brush at the given cell");
    println!("  + / -                Raise / lower the brush delta by one step");
    println!("  brush                Show the current brush radius and delta");
    println!("  probe <x> <y>        Show temperature, classification and conductivity");
    println!("  render               Write the current field as edit.ppm");
    println!("  status               Show field statistics");
    println!("  reset <w> <h>        Rebuild the field with new dimensions");
    println!("  quit                 Exit the editor");
}

fn render_to_file(field: &DiffusionField, cfg: &RenderConfig) -> io::Result<()> {
    let frame = field.render(cfg, 1, false);
    write_ppm(Path::new("edit.ppm"), &frame)
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
