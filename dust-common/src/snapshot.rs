use serde::{Deserialize, Serialize};

/// Number of tracked element mass-fraction slots per gas particle.
/// Slot layout follows the GIZMO metallicity array convention:
/// 0 = total metals, then He, C, N, O, Ne, Mg, Si, S, Ca, Fe.
pub const N_ELEMENTS: usize = 11;
pub const ELEM_METALS: usize = 0;
pub const ELEM_HE: usize = 1;
pub const ELEM_C: usize = 2;
pub const ELEM_N: usize = 3;
pub const ELEM_O: usize = 4;
pub const ELEM_NE: usize = 5;
pub const ELEM_MG: usize = 6;
pub const ELEM_SI: usize = 7;
pub const ELEM_S: usize = 8;
pub const ELEM_CA: usize = 9;
pub const ELEM_FE: usize = 10;

/// Number of dust species slots: silicate, carbonaceous, SiC, free-flying iron,
/// oxygen reservoir.
pub const N_DUST_SPECIES: usize = 5;

/// Number of dust production-source slots: gas-phase accretion, SNe Ia, SNe II, AGB
/// winds.
pub const N_DUST_SOURCES: usize = 4;

/// Header scalars for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Simulation time in Gyr (for cosmological runs, the age of the universe).
    pub time_gyr: f64,
    /// Redshift; only meaningful when `cosmological` is true.
    pub redshift: f64,
    /// Cosmological scale factor a = 1/(1+z); 1.0 for non-cosmological runs.
    pub scale_factor: f64,
    /// Periodic box side length in kpc.
    pub box_size_kpc: f64,
    pub cosmological: bool,
}

/// Gas particle data in struct-of-arrays layout. All vectors are parallel; element
/// i of each describes the same particle.
///
/// Species and source fractions are fractions of the particle's *total* mass, so the
/// mass of e.g. silicate dust in a particle is `masses[i] * species_fractions[i][0]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GasParticles {
    /// Positions in kpc.
    pub positions: Vec<[f64; 3]>,
    /// Masses in Msun.
    pub masses: Vec<f64>,
    /// Velocities in km/s.
    pub velocities: Vec<[f64; 3]>,
    /// Temperatures in K.
    pub temperatures: Vec<f64>,
    /// Hydrogen number densities in cm^-3.
    pub number_densities: Vec<f64>,
    /// Neutral hydrogen mass fractions (0-1).
    pub neutral_fractions: Vec<f64>,
    /// Molecular mass fractions of the neutral component (0-1).
    pub molecular_fractions: Vec<f64>,
    /// Subgrid dense-gas mass fractions (0-1).
    pub dense_fractions: Vec<f64>,
    /// Element mass fractions, `N_ELEMENTS` slots per particle.
    pub element_fractions: Vec<[f64; N_ELEMENTS]>,
    /// Element mass fractions locked in dust, same slot layout.
    pub dust_element_fractions: Vec<[f64; N_ELEMENTS]>,
    /// Total dust mass fractions (0-1).
    pub dust_mass_fractions: Vec<f64>,
    /// Dust species mass fractions, `N_DUST_SPECIES` slots per particle.
    pub species_fractions: Vec<[f64; N_DUST_SPECIES]>,
    /// Dust source mass fractions, `N_DUST_SOURCES` slots per particle.
    pub source_fractions: Vec<[f64; N_DUST_SOURCES]>,
    /// Mass fractions of carbon locked in CO.
    pub c_in_co_fractions: Vec<f64>,
}

/// Star particle data in struct-of-arrays layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarParticles {
    /// Positions in kpc.
    pub positions: Vec<[f64; 3]>,
    /// Masses in Msun.
    pub masses: Vec<f64>,
    /// Velocities in km/s.
    pub velocities: Vec<[f64; 3]>,
    /// Stellar ages in Gyr.
    pub ages_gyr: Vec<f64>,
}

/// One snapshot's full particle dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub header: SnapshotHeader,
    pub gas: GasParticles,
    pub stars: StarParticles,
}

impl GasParticles {
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Returns a copy containing only the particles where `mask` is true.
    /// `mask` must have the same length as the particle arrays.
    pub fn filtered(&self, mask: &[bool]) -> GasParticles {
        debug_assert_eq!(mask.len(), self.len());
        fn keep<T: Copy>(src: &[T], mask: &[bool]) -> Vec<T> {
            src.iter()
                .zip(mask.iter())
                .filter(|(_, &m)| m)
                .map(|(&v, _)| v)
                .collect()
        }
        GasParticles {
            positions: keep(&self.positions, mask),
            masses: keep(&self.masses, mask),
            velocities: keep(&self.velocities, mask),
            temperatures: keep(&self.temperatures, mask),
            number_densities: keep(&self.number_densities, mask),
            neutral_fractions: keep(&self.neutral_fractions, mask),
            molecular_fractions: keep(&self.molecular_fractions, mask),
            dense_fractions: keep(&self.dense_fractions, mask),
            element_fractions: keep(&self.element_fractions, mask),
            dust_element_fractions: keep(&self.dust_element_fractions, mask),
            dust_mass_fractions: keep(&self.dust_mass_fractions, mask),
            species_fractions: keep(&self.species_fractions, mask),
            source_fractions: keep(&self.source_fractions, mask),
            c_in_co_fractions: keep(&self.c_in_co_fractions, mask),
        }
    }
}

impl StarParticles {
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Returns a copy containing only the particles where `mask` is true.
    pub fn filtered(&self, mask: &[bool]) -> StarParticles {
        debug_assert_eq!(mask.len(), self.len());
        fn keep<T: Copy>(src: &[T], mask: &[bool]) -> Vec<T> {
            src.iter()
                .zip(mask.iter())
                .filter(|(_, &m)| m)
                .map(|(&v, _)| v)
                .collect()
        }
        StarParticles {
            positions: keep(&self.positions, mask),
            masses: keep(&self.masses, mask),
            velocities: keep(&self.velocities, mask),
            ages_gyr: keep(&self.ages_gyr, mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_gas_particles() -> GasParticles {
        GasParticles {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]],
            masses: vec![10.0, 20.0],
            velocities: vec![[0.0; 3]; 2],
            temperatures: vec![100.0, 2.0e4],
            number_densities: vec![1.0, 0.01],
            neutral_fractions: vec![0.9, 0.1],
            molecular_fractions: vec![0.8, 0.0],
            dense_fractions: vec![0.5, 0.0],
            element_fractions: vec![[0.02; N_ELEMENTS]; 2],
            dust_element_fractions: vec![[0.001; N_ELEMENTS]; 2],
            dust_mass_fractions: vec![0.01, 0.002],
            species_fractions: vec![[0.002; N_DUST_SPECIES]; 2],
            source_fractions: vec![[0.0025; N_DUST_SOURCES]; 2],
            c_in_co_fractions: vec![0.001, 0.0],
        }
    }

    #[test]
    fn filtered_keeps_masked_particles_only() {
        let gas = two_gas_particles();
        let kept = gas.filtered(&[false, true]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.masses, vec![20.0]);
        assert_eq!(kept.positions, vec![[1.0, 2.0, 3.0]]);
        assert_eq!(kept.temperatures, vec![2.0e4]);
    }

    #[test]
    fn filtered_with_all_false_is_empty() {
        let gas = two_gas_particles();
        let kept = gas.filtered(&[false, false]);
        assert!(kept.is_empty());
        assert_eq!(kept.element_fractions.len(), 0);
    }

    #[test]
    fn star_filter_keeps_parallel_arrays_aligned() {
        let stars = StarParticles {
            positions: vec![[0.0; 3], [1.0; 3], [2.0; 3]],
            masses: vec![1.0, 2.0, 3.0],
            velocities: vec![[0.0; 3]; 3],
            ages_gyr: vec![0.005, 0.5, 5.0],
        };
        let kept = stars.filtered(&[true, false, true]);
        assert_eq!(kept.masses, vec![1.0, 3.0]);
        assert_eq!(kept.ages_gyr, vec![0.005, 5.0]);
    }
}
