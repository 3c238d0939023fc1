use anyhow::Result;
use log::{debug, info};
use std::time::Instant;

// Define modules used by main
mod evolution;
mod export;
mod quantities;
mod reader;
mod region;
mod stats;

use dust_common::AnalysisConfig;
use evolution::DustEvo;
use reader::DirectoryReader;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting dust evolution aggregation...");

    // --- Load Configuration ---
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "analysis.toml".to_string());
    let config = AnalysisConfig::load(&config_path)?;
    debug!("Analysis configuration: {:#?}", config);

    // --- Construct Aggregator (restores any existing cache) ---
    let reader = DirectoryReader::new(&config.simulation.snapshot_dir);
    let mut evo = DustEvo::new(reader, &config)?;
    evo.set_region_from_config(&config);

    // --- Aggregation Loop ---
    info!(
        "Aggregating snapshots {}..={} from '{}' ({} per batch).",
        config.simulation.snap_lo,
        config.simulation.snap_hi,
        config.simulation.snapshot_dir,
        config.output.increment
    );
    let start_time = Instant::now();
    evo.load(config.output.increment)?;
    let loaded = evo.state().loaded_flags().iter().filter(|&&l| l).count();
    info!(
        "Aggregation finished in {:.3} seconds ({}/{} snapshots loaded, cache at '{}').",
        start_time.elapsed().as_secs_f64(),
        loaded,
        evo.state().num_snaps(),
        evo.cache_path().display()
    );

    // --- Export Series ---
    export::write_series(&evo, &config)?;

    info!("Analysis complete.");
    Ok(())
}
