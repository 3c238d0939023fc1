use dust_common::snapshot::{GasParticles, StarParticles, ELEM_C, ELEM_HE, ELEM_METALS, ELEM_O};
use dust_common::units::Constants;
use crate::stats::nan_sum;
use anyhow::bail;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dust grain species tracked by the simulation's dust model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DustSpecies {
    Silicate,
    Carbonaceous,
    SiliconCarbide,
    Iron,
    OxygenReservoir,
}

impl DustSpecies {
    /// Slot in `GasParticles::species_fractions`.
    pub fn slot(&self) -> usize {
        match self {
            DustSpecies::Silicate => 0,
            DustSpecies::Carbonaceous => 1,
            DustSpecies::SiliconCarbide => 2,
            DustSpecies::Iron => 3,
            DustSpecies::OxygenReservoir => 4,
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            DustSpecies::Silicate => "sil",
            DustSpecies::Carbonaceous => "carb",
            DustSpecies::SiliconCarbide => "SiC",
            DustSpecies::Iron => "iron",
            DustSpecies::OxygenReservoir => "ORes",
        }
    }
}

/// Channels through which dust mass is produced or grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DustSource {
    Accretion,
    SneIa,
    SneII,
    Agb,
}

impl DustSource {
    /// Slot in `GasParticles::source_fractions`.
    pub fn slot(&self) -> usize {
        match self {
            DustSource::Accretion => 0,
            DustSource::SneIa => 1,
            DustSource::SneII => 2,
            DustSource::Agb => 3,
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            DustSource::Accretion => "acc",
            DustSource::SneIa => "SNeIa",
            DustSource::SneII => "SNeII",
            DustSource::Agb => "AGB",
        }
    }
}

/// Gas quantities summed over all filtered particles per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TotalQuantity {
    GasMass,
    MolecularMass,
    NeutralMass,
    DustMass,
    MetalMass,
    SpeciesMass(DustSpecies),
    SourceMass(DustSource),
}

impl TotalQuantity {
    /// Per-particle component masses in Msun; summed (NaN-excluded) to produce the
    /// snapshot total.
    pub fn values(&self, gas: &GasParticles) -> Vec<f64> {
        let m = &gas.masses;
        match *self {
            TotalQuantity::GasMass => m.clone(),
            // Molecular fraction applies to the neutral component.
            TotalQuantity::MolecularMass => m
                .iter()
                .zip(gas.molecular_fractions.iter().zip(gas.neutral_fractions.iter()))
                .map(|(&m, (&fh2, &fn_))| m * fh2 * fn_)
                .collect(),
            TotalQuantity::NeutralMass => m
                .iter()
                .zip(gas.neutral_fractions.iter())
                .map(|(&m, &f)| m * f)
                .collect(),
            TotalQuantity::DustMass => m
                .iter()
                .zip(gas.dust_mass_fractions.iter())
                .map(|(&m, &f)| m * f)
                .collect(),
            TotalQuantity::MetalMass => m
                .iter()
                .zip(gas.element_fractions.iter())
                .map(|(&m, e)| m * e[ELEM_METALS])
                .collect(),
            TotalQuantity::SpeciesMass(sp) => m
                .iter()
                .zip(gas.species_fractions.iter())
                .map(|(&m, f)| m * f[sp.slot()])
                .collect(),
            TotalQuantity::SourceMass(src) => m
                .iter()
                .zip(gas.source_fractions.iter())
                .map(|(&m, f)| m * f[src.slot()])
                .collect(),
        }
    }
}

impl fmt::Display for TotalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TotalQuantity::GasMass => write!(f, "M_gas"),
            TotalQuantity::MolecularMass => write!(f, "M_H2"),
            TotalQuantity::NeutralMass => write!(f, "M_gas_neutral"),
            TotalQuantity::DustMass => write!(f, "M_dust"),
            TotalQuantity::MetalMass => write!(f, "M_metals"),
            TotalQuantity::SpeciesMass(sp) => write!(f, "M_{}", sp.short_name()),
            TotalQuantity::SourceMass(src) => write!(f, "M_{}_dust", src.short_name()),
        }
    }
}

impl FromStr for TotalQuantity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "M_gas" => TotalQuantity::GasMass,
            "M_H2" => TotalQuantity::MolecularMass,
            "M_gas_neutral" => TotalQuantity::NeutralMass,
            "M_dust" => TotalQuantity::DustMass,
            "M_metals" => TotalQuantity::MetalMass,
            "M_sil" => TotalQuantity::SpeciesMass(DustSpecies::Silicate),
            "M_carb" => TotalQuantity::SpeciesMass(DustSpecies::Carbonaceous),
            "M_SiC" => TotalQuantity::SpeciesMass(DustSpecies::SiliconCarbide),
            "M_iron" => TotalQuantity::SpeciesMass(DustSpecies::Iron),
            "M_ORes" => TotalQuantity::SpeciesMass(DustSpecies::OxygenReservoir),
            "M_acc_dust" => TotalQuantity::SourceMass(DustSource::Accretion),
            "M_SNeIa_dust" => TotalQuantity::SourceMass(DustSource::SneIa),
            "M_SNeII_dust" => TotalQuantity::SourceMass(DustSource::SneII),
            "M_AGB_dust" => TotalQuantity::SourceMass(DustSource::Agb),
            other => bail!("unknown total quantity '{other}'"),
        })
    }
}

/// Gas properties whose mass-weighted median is tracked per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MedianQuantity {
    /// D/Z: fraction of metal mass locked in dust.
    DustToMetals,
    /// Metallicity in solar units.
    Metallicity,
    /// 12 + log10(n_O/n_H) over all oxygen.
    OxygenAbundance,
    /// 12 + log10(n_O/n_H) counting only gas-phase (dust-depleted) oxygen.
    GasOxygenAbundance,
    /// Fraction of metal mass in dust from one production channel.
    SourceToMetals(DustSource),
    /// Fraction of metal mass in one dust species.
    SpeciesToMetals(DustSpecies),
    /// Fraction of carbon locked in CO.
    CarbonInCo,
    /// Subgrid dense-gas mass fraction.
    DenseFraction,
    /// Molecular mass fraction.
    MolecularFraction,
}

impl MedianQuantity {
    /// Per-particle values of this property.
    pub fn values(&self, gas: &GasParticles, constants: &Constants) -> Vec<f64> {
        match *self {
            MedianQuantity::DustToMetals => gas
                .dust_mass_fractions
                .iter()
                .zip(gas.element_fractions.iter())
                .map(|(&dz, e)| dz / e[ELEM_METALS])
                .collect(),
            MedianQuantity::Metallicity => gas
                .element_fractions
                .iter()
                .map(|e| e[ELEM_METALS] / constants.solar_metallicity)
                .collect(),
            MedianQuantity::OxygenAbundance => gas
                .element_fractions
                .iter()
                .map(|e| oxygen_abundance(e[ELEM_O], e[ELEM_METALS], e[ELEM_HE]))
                .collect(),
            MedianQuantity::GasOxygenAbundance => gas
                .element_fractions
                .iter()
                .zip(gas.dust_element_fractions.iter())
                .map(|(e, d)| oxygen_abundance(e[ELEM_O] - d[ELEM_O], e[ELEM_METALS], e[ELEM_HE]))
                .collect(),
            MedianQuantity::SourceToMetals(src) => gas
                .source_fractions
                .iter()
                .zip(gas.element_fractions.iter())
                .map(|(f, e)| f[src.slot()] / e[ELEM_METALS])
                .collect(),
            MedianQuantity::SpeciesToMetals(sp) => gas
                .species_fractions
                .iter()
                .zip(gas.element_fractions.iter())
                .map(|(f, e)| f[sp.slot()] / e[ELEM_METALS])
                .collect(),
            MedianQuantity::CarbonInCo => gas
                .c_in_co_fractions
                .iter()
                .zip(gas.element_fractions.iter())
                .map(|(&co, e)| co / e[ELEM_C])
                .collect(),
            MedianQuantity::DenseFraction => gas.dense_fractions.clone(),
            MedianQuantity::MolecularFraction => gas.molecular_fractions.clone(),
        }
    }
}

// 12 + log10(n_O/n_H) with mass fractions; hydrogen is what is left after metals
// and helium. Atomic masses 16 and 1.
fn oxygen_abundance(oxygen_frac: f64, metal_frac: f64, helium_frac: f64) -> f64 {
    let hydrogen_frac = 1.0 - metal_frac - helium_frac;
    12.0 + ((oxygen_frac / 16.0) / hydrogen_frac).log10()
}

impl fmt::Display for MedianQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MedianQuantity::DustToMetals => write!(f, "D/Z"),
            MedianQuantity::Metallicity => write!(f, "Z"),
            MedianQuantity::OxygenAbundance => write!(f, "O/H"),
            MedianQuantity::GasOxygenAbundance => write!(f, "O/H_gas"),
            MedianQuantity::SourceToMetals(src) => write!(f, "dz_{}", src.short_name()),
            MedianQuantity::SpeciesToMetals(sp) => write!(f, "dz_{}", sp.short_name()),
            MedianQuantity::CarbonInCo => write!(f, "CinCO"),
            MedianQuantity::DenseFraction => write!(f, "fdense"),
            MedianQuantity::MolecularFraction => write!(f, "fH2"),
        }
    }
}

impl FromStr for MedianQuantity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "D/Z" => MedianQuantity::DustToMetals,
            "Z" => MedianQuantity::Metallicity,
            "O/H" => MedianQuantity::OxygenAbundance,
            "O/H_gas" => MedianQuantity::GasOxygenAbundance,
            "dz_acc" => MedianQuantity::SourceToMetals(DustSource::Accretion),
            "dz_SNeIa" => MedianQuantity::SourceToMetals(DustSource::SneIa),
            "dz_SNeII" => MedianQuantity::SourceToMetals(DustSource::SneII),
            "dz_AGB" => MedianQuantity::SourceToMetals(DustSource::Agb),
            "dz_sil" => MedianQuantity::SpeciesToMetals(DustSpecies::Silicate),
            "dz_carb" => MedianQuantity::SpeciesToMetals(DustSpecies::Carbonaceous),
            "dz_SiC" => MedianQuantity::SpeciesToMetals(DustSpecies::SiliconCarbide),
            "dz_iron" => MedianQuantity::SpeciesToMetals(DustSpecies::Iron),
            "dz_ORes" => MedianQuantity::SpeciesToMetals(DustSpecies::OxygenReservoir),
            "CinCO" => MedianQuantity::CarbonInCo,
            "fdense" => MedianQuantity::DenseFraction,
            "fH2" => MedianQuantity::MolecularFraction,
            other => bail!("unknown median quantity '{other}'"),
        })
    }
}

/// Named particle-selection predicates over the filtered gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subsample {
    All,
    Cold,
    Hot,
    Neutral,
    Molecular,
}

impl Subsample {
    /// Lenient name lookup: an unrecognized predicate includes all particles, it
    /// never fails.
    pub fn from_name(name: &str) -> Subsample {
        match name {
            "all" => Subsample::All,
            "cold" => Subsample::Cold,
            "hot" => Subsample::Hot,
            "neutral" => Subsample::Neutral,
            "molecular" => Subsample::Molecular,
            other => {
                warn!("Median subsampling '{other}' is not supported so assuming all");
                Subsample::All
            }
        }
    }

    pub fn mask(&self, gas: &GasParticles, constants: &Constants) -> Vec<bool> {
        match self {
            Subsample::All => vec![true; gas.len()],
            Subsample::Cold => gas
                .temperatures
                .iter()
                .map(|&t| t <= constants.cold_temp_max_k)
                .collect(),
            Subsample::Hot => gas
                .temperatures
                .iter()
                .map(|&t| t >= constants.hot_temp_min_k)
                .collect(),
            Subsample::Neutral => gas
                .neutral_fractions
                .iter()
                .map(|&f| f > constants.neutral_fraction_min)
                .collect(),
            Subsample::Molecular => gas
                .molecular_fractions
                .iter()
                .zip(gas.neutral_fractions.iter())
                .map(|(&fh2, &fn_)| fh2 * fn_ > constants.molecular_fraction_min)
                .collect(),
        }
    }
}

impl fmt::Display for Subsample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subsample::All => "all",
            Subsample::Cold => "cold",
            Subsample::Hot => "hot",
            Subsample::Neutral => "neutral",
            Subsample::Molecular => "molecular",
        };
        write!(f, "{name}")
    }
}

/// Star quantities summed over all filtered star particles per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StarQuantity {
    StellarMass,
    /// Instantaneous star-formation rate in Msun/yr: mass formed within the age
    /// cutoff, divided by the cutoff.
    StarFormationRate,
}

impl StarQuantity {
    pub fn evaluate(&self, stars: &StarParticles, constants: &Constants) -> f64 {
        match self {
            StarQuantity::StellarMass => nan_sum(&stars.masses),
            StarQuantity::StarFormationRate => {
                let cutoff = constants.sfr_age_cutoff_gyr;
                let young: Vec<f64> = stars
                    .masses
                    .iter()
                    .zip(stars.ages_gyr.iter())
                    .filter(|(_, &age)| age <= cutoff)
                    .map(|(&m, _)| m)
                    .collect();
                nan_sum(&young) / (cutoff * 1.0e9)
            }
        }
    }
}

impl fmt::Display for StarQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StarQuantity::StellarMass => write!(f, "M_star"),
            StarQuantity::StarFormationRate => write!(f, "sfr"),
        }
    }
}

impl FromStr for StarQuantity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "M_star" => StarQuantity::StellarMass,
            "sfr" => StarQuantity::StarFormationRate,
            other => bail!("unknown star quantity '{other}'"),
        })
    }
}

/// Which aggregate of a quantity to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Total,
    Median,
}

/// The full fetch vocabulary: stored series plus on-the-fly derived fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataName {
    Total(TotalQuantity),
    Median(MedianQuantity),
    Star(StarQuantity),
    Time,
    Redshift,
    /// Fraction of dust mass produced through one channel. As a total this is
    /// `M_<src>_dust / M_dust`; as a median it is the stored `dz_<src>` series.
    SourceFraction(DustSource),
    /// Fraction of dust mass in one species; analogous to `SourceFraction`.
    SpeciesFraction(DustSpecies),
}

impl fmt::Display for DataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DataName::Total(q) => write!(f, "{q}"),
            DataName::Median(q) => write!(f, "{q}"),
            DataName::Star(q) => write!(f, "{q}"),
            DataName::Time => write!(f, "time"),
            DataName::Redshift => write!(f, "redshift"),
            DataName::SourceFraction(src) => write!(f, "source_{}", src.short_name()),
            DataName::SpeciesFraction(sp) => write!(f, "spec_{}", sp.short_name()),
        }
    }
}

impl FromStr for DataName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "time" => DataName::Time,
            "redshift" => DataName::Redshift,
            "source_acc" => DataName::SourceFraction(DustSource::Accretion),
            "source_SNeIa" => DataName::SourceFraction(DustSource::SneIa),
            "source_SNeII" => DataName::SourceFraction(DustSource::SneII),
            "source_AGB" => DataName::SourceFraction(DustSource::Agb),
            "spec_sil" => DataName::SpeciesFraction(DustSpecies::Silicate),
            "spec_carb" => DataName::SpeciesFraction(DustSpecies::Carbonaceous),
            "spec_SiC" => DataName::SpeciesFraction(DustSpecies::SiliconCarbide),
            "spec_iron" => DataName::SpeciesFraction(DustSpecies::Iron),
            "spec_ORes" => DataName::SpeciesFraction(DustSpecies::OxygenReservoir),
            other => {
                if let Ok(q) = other.parse::<TotalQuantity>() {
                    DataName::Total(q)
                } else if let Ok(q) = other.parse::<MedianQuantity>() {
                    DataName::Median(q)
                } else if let Ok(q) = other.parse::<StarQuantity>() {
                    DataName::Star(q)
                } else {
                    bail!("'{other}' is not in the dataset");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dust_common::snapshot::{N_DUST_SOURCES, N_DUST_SPECIES, N_ELEMENTS};

    fn gas() -> GasParticles {
        let mut elem = [0.0; N_ELEMENTS];
        elem[ELEM_METALS] = 0.02;
        elem[ELEM_HE] = 0.28;
        elem[ELEM_C] = 0.003;
        elem[ELEM_O] = 0.008;
        let mut dust_elem = [0.0; N_ELEMENTS];
        dust_elem[ELEM_O] = 0.004;
        let mut species = [0.0; N_DUST_SPECIES];
        species[DustSpecies::Silicate.slot()] = 0.004;
        let mut sources = [0.0; N_DUST_SOURCES];
        sources[DustSource::Accretion.slot()] = 0.006;
        GasParticles {
            positions: vec![[0.0; 3]],
            masses: vec![1000.0],
            velocities: vec![[0.0; 3]],
            temperatures: vec![500.0],
            number_densities: vec![10.0],
            neutral_fractions: vec![0.9],
            molecular_fractions: vec![0.8],
            dense_fractions: vec![0.3],
            element_fractions: vec![elem],
            dust_element_fractions: vec![dust_elem],
            dust_mass_fractions: vec![0.01],
            species_fractions: vec![species],
            source_fractions: vec![sources],
            c_in_co_fractions: vec![0.0015],
        }
    }

    #[test]
    fn total_names_round_trip() {
        for name in [
            "M_gas", "M_H2", "M_gas_neutral", "M_dust", "M_metals", "M_sil", "M_carb",
            "M_SiC", "M_iron", "M_ORes", "M_acc_dust", "M_SNeIa_dust", "M_SNeII_dust",
            "M_AGB_dust",
        ] {
            let q: TotalQuantity = name.parse().unwrap();
            assert_eq!(q.to_string(), name);
        }
        assert!("M_unobtainium".parse::<TotalQuantity>().is_err());
    }

    #[test]
    fn median_names_round_trip() {
        for name in [
            "D/Z", "Z", "O/H", "O/H_gas", "dz_acc", "dz_SNeIa", "dz_SNeII", "dz_AGB",
            "dz_sil", "dz_carb", "dz_SiC", "dz_iron", "dz_ORes", "CinCO", "fdense", "fH2",
        ] {
            let q: MedianQuantity = name.parse().unwrap();
            assert_eq!(q.to_string(), name);
        }
    }

    #[test]
    fn component_mass_formulas() {
        let gas = gas();
        assert_eq!(TotalQuantity::GasMass.values(&gas), vec![1000.0]);
        let h2 = TotalQuantity::MolecularMass.values(&gas)[0];
        assert!((h2 - 1000.0 * 0.8 * 0.9).abs() < 1e-9);
        assert!((TotalQuantity::DustMass.values(&gas)[0] - 10.0).abs() < 1e-9);
        assert!((TotalQuantity::MetalMass.values(&gas)[0] - 20.0).abs() < 1e-9);
        let sil = TotalQuantity::SpeciesMass(DustSpecies::Silicate).values(&gas)[0];
        assert!((sil - 4.0).abs() < 1e-9);
        let acc = TotalQuantity::SourceMass(DustSource::Accretion).values(&gas)[0];
        assert!((acc - 6.0).abs() < 1e-9);
    }

    #[test]
    fn median_value_formulas() {
        let gas = gas();
        let constants = Constants::default();
        let dz = MedianQuantity::DustToMetals.values(&gas, &constants)[0];
        assert!((dz - 0.5).abs() < 1e-9);
        let z = MedianQuantity::Metallicity.values(&gas, &constants)[0];
        assert!((z - 1.0).abs() < 1e-9);
        let oh = MedianQuantity::OxygenAbundance.values(&gas, &constants)[0];
        let expected = 12.0 + ((0.008 / 16.0) / 0.70f64).log10();
        assert!((oh - expected).abs() < 1e-9);
        let oh_gas = MedianQuantity::GasOxygenAbundance.values(&gas, &constants)[0];
        assert!(oh_gas < oh, "depleted abundance must be lower");
        let cinco = MedianQuantity::CarbonInCo.values(&gas, &constants)[0];
        assert!((cinco - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dust_to_metals_is_nan_for_metal_free_gas() {
        let mut gas = gas();
        gas.element_fractions[0][ELEM_METALS] = 0.0;
        gas.dust_mass_fractions[0] = 0.0;
        let dz = MedianQuantity::DustToMetals.values(&gas, &Constants::default())[0];
        assert!(dz.is_nan());
    }

    #[test]
    fn unknown_subsample_falls_back_to_all() {
        assert_eq!(Subsample::from_name("lukewarm"), Subsample::All);
        assert_eq!(Subsample::from_name("cold"), Subsample::Cold);
    }

    #[test]
    fn subsample_masks_apply_thresholds() {
        let constants = Constants::default();
        let mut gas = gas();
        gas.temperatures = vec![500.0];
        assert_eq!(Subsample::Cold.mask(&gas, &constants), vec![true]);
        assert_eq!(Subsample::Hot.mask(&gas, &constants), vec![false]);
        assert_eq!(Subsample::Neutral.mask(&gas, &constants), vec![true]);
        // 0.8 * 0.9 = 0.72 > 0.5
        assert_eq!(Subsample::Molecular.mask(&gas, &constants), vec![true]);
    }

    #[test]
    fn sfr_counts_only_young_stars() {
        let constants = Constants::default();
        let stars = StarParticles {
            positions: vec![[0.0; 3]; 3],
            masses: vec![1.0e6, 2.0e6, 5.0e6],
            velocities: vec![[0.0; 3]; 3],
            ages_gyr: vec![0.005, 0.009, 1.0],
        };
        let sfr = StarQuantity::StarFormationRate.evaluate(&stars, &constants);
        // 3e6 Msun formed in the last 10 Myr.
        assert!((sfr - 0.3).abs() < 1e-9);
        let m = StarQuantity::StellarMass.evaluate(&stars, &constants);
        assert_eq!(m, 8.0e6);
    }

    #[test]
    fn data_name_parsing_covers_derived_fractions() {
        assert_eq!(
            "source_acc".parse::<DataName>().unwrap(),
            DataName::SourceFraction(DustSource::Accretion)
        );
        assert_eq!(
            "spec_sil".parse::<DataName>().unwrap(),
            DataName::SpeciesFraction(DustSpecies::Silicate)
        );
        assert_eq!("time".parse::<DataName>().unwrap(), DataName::Time);
        assert_eq!(
            "D/Z".parse::<DataName>().unwrap(),
            DataName::Median(MedianQuantity::DustToMetals)
        );
        assert!("spec_adamantium".parse::<DataName>().is_err());
    }
}
