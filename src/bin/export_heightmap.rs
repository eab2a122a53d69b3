//! Heightmap exporter - writes a generated terrain as a 16-bit grayscale PNG.
//!
//! Usage: cargo run --release --bin export_heightmap -- [OPTIONS]
//!
//! Options:
//!   --exponent <N>     Side length is 2^N + 1 samples (default: 8)
//!   --seed <SEED>      Random seed (default: 1519128009)
//!   --smoothness <S>   Displacement divisor (default: 0.5)
//!   --no-runway        Leave the runway region untouched
//!   --out <PATH>       Output file (default: heightmap.png)

use std::path::PathBuf;

use flightsim::core::logging;
use flightsim::terrain::{export, RunwayParams, Terrain, TerrainParams};

fn main() {
    logging::init_with_default("info");

    let args: Vec<String> = std::env::args().collect();
    let defaults = TerrainParams::default();
    let params = TerrainParams {
        size_exponent: parse_u32_arg(&args, "--exponent").unwrap_or(defaults.size_exponent),
        seed: parse_u64_arg(&args, "--seed").unwrap_or(defaults.seed),
        smoothness: parse_f32_arg(&args, "--smoothness").unwrap_or(defaults.smoothness),
        ..defaults
    };
    let runway = (!args.iter().any(|a| a == "--no-runway")).then(RunwayParams::default);
    let out = parse_str_arg(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("heightmap.png"));

    println!("=== Flightsim Heightmap Export ===");
    println!("Size:       {0} x {0}", params.size());
    println!("Seed:       {}", params.seed);
    println!("Smoothness: {}", params.smoothness);
    println!("Runway:     {}", if runway.is_some() { "yes" } else { "no" });
    println!("Output:     {}", out.display());

    let result = Terrain::generate(params, runway.as_ref())
        .and_then(|terrain| export::save_png(terrain.heightmap(), &out));
    if let Err(e) = result {
        log::error!("Export failed: {}", e);
        std::process::exit(1);
    }
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
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
