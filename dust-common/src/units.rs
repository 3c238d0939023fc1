use serde::{Deserialize, Serialize};

/// Physical constants and phase-cut thresholds used when deriving quantities.
///
/// These were ambient module-level globals in earlier analysis pipelines; here they
/// are an explicit immutable value carried in the configuration so every run states
/// the table it was computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// Solar metal mass fraction used to express Z in solar units.
    #[serde(default = "default_solar_metallicity")]
    pub solar_metallicity: f64,
    /// Stars younger than this (Gyr) count toward the instantaneous SFR.
    #[serde(default = "default_sfr_age_cutoff_gyr")]
    pub sfr_age_cutoff_gyr: f64,
    /// Gas at or below this temperature (K) belongs to the `cold` subsample.
    #[serde(default = "default_cold_temp_max_k")]
    pub cold_temp_max_k: f64,
    /// Gas at or above this temperature (K) belongs to the `hot` subsample.
    #[serde(default = "default_hot_temp_min_k")]
    pub hot_temp_min_k: f64,
    /// Neutral-fraction threshold for the `neutral` subsample.
    #[serde(default = "default_neutral_fraction_min")]
    pub neutral_fraction_min: f64,
    /// Molecular-times-neutral-fraction threshold for the `molecular` subsample.
    #[serde(default = "default_molecular_fraction_min")]
    pub molecular_fraction_min: f64,
}

fn default_solar_metallicity() -> f64 {
    0.02
}

fn default_sfr_age_cutoff_gyr() -> f64 {
    0.01 // 10 Myr window
}

fn default_cold_temp_max_k() -> f64 {
    1.0e3
}

fn default_hot_temp_min_k() -> f64 {
    1.0e4
}

fn default_neutral_fraction_min() -> f64 {
    0.5
}

fn default_molecular_fraction_min() -> f64 {
    0.5
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            solar_metallicity: default_solar_metallicity(),
            sfr_age_cutoff_gyr: default_sfr_age_cutoff_gyr(),
            cold_temp_max_k: default_cold_temp_max_k(),
            hot_temp_min_k: default_hot_temp_min_k(),
            neutral_fraction_min: default_neutral_fraction_min(),
            molecular_fraction_min: default_molecular_fraction_min(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_serde_defaults() {
        let from_empty: Constants = toml::from_str("").unwrap();
        assert_eq!(from_empty, Constants::default());
        assert_eq!(from_empty.solar_metallicity, 0.02);
        assert_eq!(from_empty.sfr_age_cutoff_gyr, 0.01);
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let c: Constants = toml::from_str("cold_temp_max_k = 500.0").unwrap();
        assert_eq!(c.cold_temp_max_k, 500.0);
        assert_eq!(c.hot_temp_min_k, 1.0e4);
    }
}
