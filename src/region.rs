use dust_common::snapshot::{GasParticles, SnapshotHeader};
use serde::{Deserialize, Serialize};

/// Spatial filter applied to every snapshot before statistics are computed.
///
/// The disk cylinder is z-aligned; orienting it along the disk angular momentum is
/// the job of the external halo/disk loader, not this filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionSelector {
    HaloSphere {
        /// Fixed center in kpc, or None for the mass-weighted gas center.
        center_kpc: Option<[f64; 3]>,
        radius_kpc: f64,
    },
    DiskCylinder {
        center_kpc: Option<[f64; 3]>,
        radius_kpc: f64,
        /// Full height of the cylinder in kpc.
        height_kpc: f64,
    },
}

impl RegionSelector {
    fn configured_center(&self) -> Option<[f64; 3]> {
        match self {
            RegionSelector::HaloSphere { center_kpc, .. } => *center_kpc,
            RegionSelector::DiskCylinder { center_kpc, .. } => *center_kpc,
        }
    }

    /// Resolves the region center for one snapshot. A configured center is used
    /// as-is; otherwise the mass-weighted mean gas position (after any periodic
    /// remap) is taken, so gas and stars share the same center.
    pub fn resolve_center(&self, header: &SnapshotHeader, gas: &GasParticles, pb_fix: bool) -> [f64; 3] {
        if let Some(center) = self.configured_center() {
            return center;
        }
        let mut sum = [0.0f64; 3];
        let mut total_mass = 0.0;
        for (pos, &m) in gas.positions.iter().zip(gas.masses.iter()) {
            if !m.is_finite() || m <= 0.0 {
                continue;
            }
            let p = remap(*pos, header, pb_fix);
            for k in 0..3 {
                sum[k] += p[k] * m;
            }
            total_mass += m;
        }
        if total_mass <= 0.0 {
            return [0.0; 3];
        }
        [sum[0] / total_mass, sum[1] / total_mass, sum[2] / total_mass]
    }

    /// Builds an inclusion mask over `positions` relative to `center`.
    pub fn mask(
        &self,
        center: [f64; 3],
        header: &SnapshotHeader,
        positions: &[[f64; 3]],
        pb_fix: bool,
    ) -> Vec<bool> {
        match *self {
            RegionSelector::HaloSphere { radius_kpc, .. } => {
                let r2 = radius_kpc * radius_kpc;
                positions
                    .iter()
                    .map(|&p| {
                        let p = remap(p, header, pb_fix);
                        let dx = p[0] - center[0];
                        let dy = p[1] - center[1];
                        let dz = p[2] - center[2];
                        dx * dx + dy * dy + dz * dz <= r2
                    })
                    .collect()
            }
            RegionSelector::DiskCylinder {
                radius_kpc,
                height_kpc,
                ..
            } => {
                let r2 = radius_kpc * radius_kpc;
                let half_height = 0.5 * height_kpc;
                positions
                    .iter()
                    .map(|&p| {
                        let p = remap(p, header, pb_fix);
                        let dx = p[0] - center[0];
                        let dy = p[1] - center[1];
                        let dz = p[2] - center[2];
                        dx * dx + dy * dy <= r2 && dz.abs() <= half_height
                    })
                    .collect()
            }
        }
    }
}

// Shifts a position by half the box and wraps it back in. Non-cosmological runs
// with periodic boundaries can leave the galaxy split between the corners of the
// box; the half-box shift makes it contiguous again.
fn remap(pos: [f64; 3], header: &SnapshotHeader, pb_fix: bool) -> [f64; 3] {
    if !pb_fix || header.cosmological || header.box_size_kpc <= 0.0 {
        return pos;
    }
    let l = header.box_size_kpc;
    [
        (pos[0] + 0.5 * l).rem_euclid(l),
        (pos[1] + 0.5 * l).rem_euclid(l),
        (pos[2] + 0.5 * l).rem_euclid(l),
    ]
}
