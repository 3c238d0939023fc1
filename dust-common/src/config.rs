use crate::units::Constants;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the simulation run being analyzed
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationSection {
    /// Directory holding the snapshot files.
    pub snapshot_dir: String,
    /// Inclusive snapshot index range to aggregate.
    pub snap_lo: usize,
    pub snap_hi: usize,
    #[serde(default)]
    pub cosmological: bool,
    /// Recenters a non-cosmological galaxy that periodic boundaries split between
    /// the corners of the box.
    #[serde(default)]
    pub periodic_bound_fix: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Halo,
    Disk,
}

// Configuration for the spatial region filter
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegionSection {
    pub kind: RegionKind,
    /// Fixed region center in kpc; omit to use the mass-weighted gas center of each
    /// snapshot.
    #[serde(default)]
    pub center_kpc: Option<[f64; 3]>,
    pub radius_kpc: f64,
    /// Full cylinder height for `kind = "disk"`; ignored for halos.
    #[serde(default = "default_height_kpc")]
    pub height_kpc: f64,
}

fn default_height_kpc() -> f64 {
    2.0
}

// Which quantity series to track, by name
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QuantitiesSection {
    #[serde(default = "default_totals")]
    pub totals: Vec<String>,
    #[serde(default = "default_medians")]
    pub medians: Vec<String>,
    #[serde(default = "default_subsamples")]
    pub subsamples: Vec<String>,
    #[serde(default = "default_star_totals")]
    pub star_totals: Vec<String>,
}

fn default_totals() -> Vec<String> {
    [
        "M_gas", "M_H2", "M_gas_neutral", "M_dust", "M_metals", "M_sil", "M_carb",
        "M_SiC", "M_iron", "M_ORes", "M_SNeIa_dust", "M_SNeII_dust", "M_AGB_dust",
        "M_acc_dust",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_medians() -> Vec<String> {
    [
        "D/Z", "Z", "O/H", "O/H_gas", "dz_acc", "dz_SNeIa", "dz_SNeII", "dz_AGB",
        "dz_sil", "dz_carb", "dz_SiC", "dz_iron", "dz_ORes", "CinCO", "fdense", "fH2",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_subsamples() -> Vec<String> {
    ["all", "cold", "hot", "neutral", "molecular"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_star_totals() -> Vec<String> {
    ["M_star", "sfr"].iter().map(|s| s.to_string()).collect()
}

impl Default for QuantitiesSection {
    fn default() -> Self {
        QuantitiesSection {
            totals: default_totals(),
            medians: default_medians(),
            subsamples: default_subsamples(),
            star_totals: default_star_totals(),
        }
    }
}

// Configuration for cache placement and series export
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputSection {
    /// Directory for the aggregation cache file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Optional label inserted into the cache file name to keep several
    /// aggregations of the same directory apart.
    #[serde(default)]
    pub name_prefix: String,
    /// Snapshots processed per batch; the cache is written after every batch.
    #[serde(default = "default_increment")]
    pub increment: usize,
    pub base_filename: String,
    /// Export format: "csv", "json", "bincode", "messagepack".
    pub format: Option<String>,
}

fn default_cache_dir() -> String {
    "./".to_string()
}

fn default_increment() -> usize {
    5
}

// Main analysis configuration, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AnalysisConfig {
    pub simulation: SimulationSection,
    pub region: RegionSection,
    #[serde(default)]
    pub quantities: QuantitiesSection,
    pub output: OutputSection,
    #[serde(default)]
    pub constants: Constants,
}

impl AnalysisConfig {
    /// Loads the analysis configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: AnalysisConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.snap_hi < self.simulation.snap_lo {
            anyhow::bail!(
                "snap_hi ({}) must not be below snap_lo ({}).",
                self.simulation.snap_hi,
                self.simulation.snap_lo
            );
        }
        if self.region.radius_kpc <= 0.0 {
            anyhow::bail!("radius_kpc must be positive.");
        }
        if self.region.kind == RegionKind::Disk && self.region.height_kpc <= 0.0 {
            anyhow::bail!("height_kpc must be positive for a disk region.");
        }
        if self.output.increment == 0 {
            anyhow::bail!("increment must be at least 1.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [simulation]
        snapshot_dir = "/data/fire2_dust/output"
        snap_lo = 10
        snap_hi = 20

        [region]
        kind = "halo"
        radius_kpc = 30.0

        [output]
        base_filename = "dust_evo"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AnalysisConfig = toml::from_str(MINIMAL).unwrap();
        config.validate().unwrap();
        assert_eq!(config.region.kind, RegionKind::Halo);
        assert!(config.region.center_kpc.is_none());
        assert_eq!(config.output.increment, 5);
        assert_eq!(config.quantities.subsamples.len(), 5);
        assert!(config.quantities.totals.contains(&"M_dust".to_string()));
        assert!(!config.simulation.cosmological);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config: AnalysisConfig = toml::from_str(MINIMAL).unwrap();
        config.simulation.snap_lo = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn disk_requires_positive_height() {
        let mut config: AnalysisConfig = toml::from_str(MINIMAL).unwrap();
        config.region.kind = RegionKind::Disk;
        config.region.height_kpc = 0.0;
        assert!(config.validate().is_err());
    }
}
