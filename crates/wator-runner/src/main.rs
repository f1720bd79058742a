//! Headless driver: runs one Wa-Tor simulation and prints its report as JSON.

mod telemetry;

use anyhow::{Context, Result};
use tracing::info;
use wator_core::RunConfig;
use wator_world::Simulation;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        num_ticks = config.num_ticks,
        seed = config.seed,
        "Starting Wa-Tor runner"
    );

    let mut simulation = Simulation::new(config).context("invalid run configuration")?;
    let report = simulation.run();

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    Ok(())
}

/// Configuration comes from the JSON file named by `WATOR_CONFIG`, falling
/// back to defaults. `WATOR_SEED` overrides the seed either way.
fn load_config() -> Result<RunConfig> {
    let mut config = match std::env::var("WATOR_CONFIG") {
        Ok(path) => RunConfig::from_json_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        Err(_) => RunConfig::default(),
    };

    if let Ok(seed) = std::env::var("WATOR_SEED") {
        config.seed = seed
            .parse()
            .with_context(|| format!("WATOR_SEED is not a valid u64: {}", seed))?;
    }

    Ok(config)
}
