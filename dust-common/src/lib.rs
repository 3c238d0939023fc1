pub mod config;
pub mod snapshot;
pub mod units;

// Re-export key types for easier use by dependent crates
pub use config::{AnalysisConfig, OutputSection, QuantitiesSection, RegionKind, RegionSection, SimulationSection};
pub use snapshot::{GasParticles, SnapshotData, SnapshotHeader, StarParticles};
pub use units::Constants;
