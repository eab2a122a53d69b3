//! Flightsim - headless flight demo
//!
//! Builds the default world, flies a scripted take-off and logs telemetry.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --seconds <S>       Simulated time to run (default: 20)
//!   --seed <SEED>       Terrain seed, overrides the config
//!   --config <PATH>     JSON config; missing fields take defaults
//!   --save-config <PATH> Write the effective config and exit
//!   --telemetry <PATH>  Write one telemetry sample per tick as JSON

use std::path::PathBuf;
use std::time::Instant;

use flightsim::core::input::ControlInput;
use flightsim::core::{logging, Result};
use flightsim::scene::{SceneManager, SimConfig, Telemetry};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    logging::init_with_default("info");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let seconds = parse_f32_arg(&args, "--seconds").unwrap_or(20.0);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SimConfig::load(&PathBuf::from(path))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.terrain.seed = seed;
    }
    if let Some(path) = parse_str_arg(&args, "--save-config") {
        config.save(&PathBuf::from(&path))?;
        log::info!("Wrote config to {}", path);
        return Ok(());
    }
    let telemetry_path = parse_str_arg(&args, "--telemetry").map(PathBuf::from);

    let mut world = SceneManager::new(config)?;
    let mut trace: Vec<Telemetry> = Vec::new();

    let start = Instant::now();
    let frames = (seconds / FRAME_DT).ceil() as u32;
    let mut next_report = 0.0;
    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;
        let steps = world.frame(&scripted_input(t), FRAME_DT)?;

        if steps > 0 && telemetry_path.is_some() {
            trace.push(world.telemetry()?);
        }
        if t >= next_report {
            let tel = world.telemetry()?;
            log::info!(
                "t={:5.1}s pos=({:7.1}, {:6.1}, {:7.1}) speed {:5.1} alt {:6.1}{} particles {}+{}",
                tel.time,
                tel.position.x,
                tel.position.y,
                tel.position.z,
                tel.speed,
                tel.altitude,
                if tel.on_ground { " [ground]" } else { "" },
                tel.smoke_particles,
                tel.contrail_particles
            );
            next_report += 1.0;
        }
    }

    let items = world.render_items()?;
    let lights = world.lights()?;
    let batches = world.particle_batches()?;
    log::info!(
        "Ran {} ticks in {:.1}ms: {} render items, {} lights, {} billboards",
        world.ticks(),
        start.elapsed().as_secs_f64() * 1000.0,
        items.len(),
        lights.len(),
        batches.iter().map(|b| b.instances.len()).sum::<usize>()
    );

    if let Some(path) = telemetry_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&trace)?)?;
        log::info!("Wrote {} telemetry samples to {}", trace.len(), path.display());
    }
    Ok(())
}

/// Take-off roll, rotate, climb out, a bank to the left, then level off.
/// The crate jumps once the airplane is rolling.
fn scripted_input(t: f32) -> ControlInput {
    let mut input = ControlInput::throttle(1);
    match t {
        t if t < 2.0 => {}
        t if t < 3.5 => input.pitch = -1,
        t if t < 5.0 => input.roll = 1,
        t if t < 5.5 => input.roll = -1,
        _ => {}
    }
    input.jump = (1.0..1.0 + FRAME_DT).contains(&t);
    input
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
