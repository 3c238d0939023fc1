use crate::quantities::{
    DataName, MedianQuantity, StarQuantity, Statistic, Subsample, TotalQuantity,
};
use crate::reader::SnapshotReader;
use crate::region::RegionSelector;
use crate::stats::{nan_sum, weighted_median};
use anyhow::{anyhow, bail, Result};
use dust_common::config::{AnalysisConfig, RegionKind};
use dust_common::units::Constants;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Per-snapshot aggregation state for an inclusive snapshot index range.
///
/// Every series has one slot per index in `[snap_lo, snap_hi]`. `loaded[i]` true
/// means every series holds its finalized value at slot i; false means the slots
/// are zero placeholders. The whole struct round-trips through the cache file as
/// one unit; `BTreeMap` keys keep the serialization deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvoState {
    snap_lo: usize,
    snap_hi: usize,
    cosmological: bool,
    pb_fix: bool,
    region: Option<RegionSelector>,
    loaded: Vec<bool>,
    time: Vec<f64>,
    redshift: Vec<f64>,
    totals: BTreeMap<TotalQuantity, Vec<f64>>,
    star_totals: BTreeMap<StarQuantity, Vec<f64>>,
    medians: BTreeMap<Subsample, BTreeMap<MedianQuantity, Vec<f64>>>,
    all_loaded: bool,
}

impl EvoState {
    pub fn new(
        snap_lo: usize,
        snap_hi: usize,
        cosmological: bool,
        pb_fix: bool,
        totals: &[TotalQuantity],
        medians: &[MedianQuantity],
        subsamples: &[Subsample],
        star_totals: &[StarQuantity],
    ) -> EvoState {
        let n = snap_hi - snap_lo + 1;
        let per_quantity: BTreeMap<MedianQuantity, Vec<f64>> =
            medians.iter().map(|&q| (q, vec![0.0; n])).collect();
        EvoState {
            snap_lo,
            snap_hi,
            cosmological,
            // The periodic corner fix only applies to non-cosmological boxes.
            pb_fix: pb_fix && !cosmological,
            region: None,
            loaded: vec![false; n],
            time: vec![0.0; n],
            redshift: vec![0.0; n],
            totals: totals.iter().map(|&q| (q, vec![0.0; n])).collect(),
            star_totals: star_totals.iter().map(|&q| (q, vec![0.0; n])).collect(),
            medians: subsamples
                .iter()
                .map(|&s| (s, per_quantity.clone()))
                .collect(),
            all_loaded: false,
        }
    }

    pub fn num_snaps(&self) -> usize {
        self.snap_hi - self.snap_lo + 1
    }

    pub fn snap_range(&self) -> (usize, usize) {
        (self.snap_lo, self.snap_hi)
    }

    pub fn is_complete(&self) -> bool {
        self.all_loaded
    }

    pub fn loaded_flags(&self) -> &[bool] {
        &self.loaded
    }

    /// Freezes the region selector. Only the first configuration takes effect;
    /// later calls are ignored with a warning.
    pub fn set_region(&mut self, selector: RegionSelector) {
        if self.region.is_some() {
            warn!("Region selector is already configured; ignoring reconfiguration.");
            return;
        }
        self.region = Some(selector);
    }

    /// Widens the covered index range, padding zero-valued unloaded slots on the
    /// affected side(s). A bound that would narrow the range is ignored for that
    /// side; cached data is never dropped.
    pub fn extend_range(&mut self, new_lo: usize, new_hi: usize) {
        if new_lo > self.snap_lo {
            warn!(
                "Narrowing snap_lo from {} to {} is not supported; keeping {}.",
                self.snap_lo, new_lo, self.snap_lo
            );
        }
        if new_hi < self.snap_hi {
            warn!(
                "Narrowing snap_hi from {} to {} is not supported; keeping {}.",
                self.snap_hi, new_hi, self.snap_hi
            );
        }
        let prepend = self.snap_lo.saturating_sub(new_lo);
        let append = new_hi.saturating_sub(self.snap_hi);
        if prepend == 0 && append == 0 {
            return;
        }
        info!(
            "Extending snapshot range [{}, {}] by {} slot(s) below and {} above.",
            self.snap_lo, self.snap_hi, prepend, append
        );
        self.snap_lo -= prepend;
        self.snap_hi += append;

        pad(&mut self.loaded, prepend, append);
        pad(&mut self.time, prepend, append);
        pad(&mut self.redshift, prepend, append);
        for series in self.totals.values_mut() {
            pad(series, prepend, append);
        }
        for series in self.star_totals.values_mut() {
            pad(series, prepend, append);
        }
        for per_quantity in self.medians.values_mut() {
            for series in per_quantity.values_mut() {
                pad(series, prepend, append);
            }
        }
        self.all_loaded = false;
    }

    /// Processes up to `increment` not-yet-loaded snapshots in ascending index
    /// order and returns how many were newly loaded. A missing or unreadable
    /// snapshot is logged, left unloaded (so a later call retries it), and the
    /// batch moves on. Errors only when no region selector has been configured.
    pub fn load_batch<R: SnapshotReader>(
        &mut self,
        reader: &R,
        increment: usize,
        constants: &Constants,
    ) -> Result<usize> {
        let Some(region) = self.region.clone() else {
            bail!("Need to call set_halo or set_disk to specify the region to aggregate over.");
        };

        let mut processed = 0;
        for i in 0..self.num_snaps() {
            if processed >= increment {
                break;
            }
            if self.loaded[i] {
                continue;
            }
            let snum = self.snap_lo + i;

            info!("Loading snapshot {snum}...");
            let snap = match reader.read(snum) {
                Ok(Some(snap)) => snap,
                Ok(None) => {
                    warn!("No snapshot found at index {snum}; leaving the slot unloaded.");
                    continue;
                }
                Err(e) => {
                    log::error!("Failed to read snapshot {snum}: {e:#}");
                    continue;
                }
            };

            self.time[i] = snap.header.time_gyr;
            if self.cosmological {
                self.redshift[i] = snap.header.redshift;
            }

            let center = region.resolve_center(&snap.header, &snap.gas, self.pb_fix);
            let gas_mask = region.mask(center, &snap.header, &snap.gas.positions, self.pb_fix);
            let gas = snap.gas.filtered(&gas_mask);

            // Subsample masks over the region-filtered gas.
            let masks: BTreeMap<Subsample, Vec<bool>> = self
                .medians
                .keys()
                .map(|&s| (s, s.mask(&gas, constants)))
                .collect();

            for (quantity, series) in self.totals.iter_mut() {
                series[i] = nan_sum(&quantity.values(&gas));
            }

            for (subsample, per_quantity) in self.medians.iter_mut() {
                let mask = &masks[subsample];
                for (quantity, series) in per_quantity.iter_mut() {
                    let values = quantity.values(&gas, constants);
                    let (v, w) = select_masked(&values, &gas.masses, mask);
                    series[i] = weighted_median(&v, &w);
                }
            }

            let star_mask = region.mask(center, &snap.header, &snap.stars.positions, self.pb_fix);
            let stars = snap.stars.filtered(&star_mask);
            for (quantity, series) in self.star_totals.iter_mut() {
                // Exactly zero, never NaN, when no star survives the filter.
                series[i] = if stars.is_empty() {
                    0.0
                } else {
                    quantity.evaluate(&stars, constants)
                };
            }

            self.loaded[i] = true;
            processed += 1;
        }

        self.all_loaded = self.loaded.iter().all(|&l| l);
        Ok(processed)
    }

    /// Restores a previously persisted state from `path`.
    pub fn restore<P: AsRef<Path>>(path: P) -> Result<EvoState> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|e| anyhow!("Failed to open cache file '{}': {}", path_ref.display(), e))?;
        let state: EvoState = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| anyhow!("Failed to decode cache file '{}': {}", path_ref.display(), e))?;
        Ok(state)
    }

    /// Persists the whole state to `path` as one opaque bincode blob.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow!("Failed to create cache directory '{}': {}", parent.display(), e)
                })?;
            }
        }
        let file = File::create(path_ref)
            .map_err(|e| anyhow!("Failed to create cache file '{}': {}", path_ref.display(), e))?;
        bincode::serialize_into(file, self)
            .map_err(|e| anyhow!("Failed to encode cache file '{}': {}", path_ref.display(), e))?;
        Ok(())
    }
}

fn pad<T: Default + Clone>(series: &mut Vec<T>, prepend: usize, append: usize) {
    let mut padded = Vec::with_capacity(series.len() + prepend + append);
    padded.extend(std::iter::repeat(T::default()).take(prepend));
    padded.append(series);
    padded.extend(std::iter::repeat(T::default()).take(append));
    *series = padded;
}

fn select_masked(values: &[f64], weights: &[f64], mask: &[bool]) -> (Vec<f64>, Vec<f64>) {
    let mut v = Vec::new();
    let mut w = Vec::new();
    for i in 0..mask.len() {
        if mask[i] {
            v.push(values[i]);
            w.push(weights[i]);
        }
    }
    (v, w)
}

/// Snapshot-range aggregator with a resumable on-disk cache.
///
/// Construction restores any existing cache for the (directory, prefix) pair and
/// widens its range if the request covers more snapshots. `load` then works through
/// the unloaded slots in bounded batches, persisting after each, so a long run can
/// be interrupted and resumed across process invocations.
pub struct DustEvo<R: SnapshotReader> {
    reader: R,
    cache_path: PathBuf,
    constants: Constants,
    state: EvoState,
}

impl<R: SnapshotReader> DustEvo<R> {
    pub fn new(reader: R, config: &AnalysisConfig) -> Result<DustEvo<R>> {
        let sim = &config.simulation;

        let mut totals = Vec::new();
        for name in &config.quantities.totals {
            totals.push(name.parse::<TotalQuantity>()?);
        }
        let mut medians = Vec::new();
        for name in &config.quantities.medians {
            medians.push(name.parse::<MedianQuantity>()?);
        }
        let subsamples: Vec<Subsample> = config
            .quantities
            .subsamples
            .iter()
            .map(|name| Subsample::from_name(name))
            .collect();
        let mut star_totals = Vec::new();
        for name in &config.quantities.star_totals {
            star_totals.push(name.parse::<StarQuantity>()?);
        }

        let cache_path = Path::new(&config.output.cache_dir).join(cache_file_name(
            &sim.snapshot_dir,
            &config.output.name_prefix,
        ));

        let state = if cache_path.is_file() {
            info!(
                "Aggregation cache found at '{}'; restoring it first.",
                cache_path.display()
            );
            let mut state = EvoState::restore(&cache_path)?;
            // A wider request than the cached range pads new unloaded slots.
            state.extend_range(sim.snap_lo, sim.snap_hi);
            state
        } else {
            EvoState::new(
                sim.snap_lo,
                sim.snap_hi,
                sim.cosmological,
                sim.periodic_bound_fix,
                &totals,
                &medians,
                &subsamples,
                &star_totals,
            )
        };

        Ok(DustEvo {
            reader,
            cache_path,
            constants: config.constants.clone(),
            state,
        })
    }

    /// Applies the configured region section; convenience over
    /// `set_halo`/`set_disk`.
    pub fn set_region_from_config(&mut self, config: &AnalysisConfig) {
        let region = &config.region;
        match region.kind {
            RegionKind::Halo => self.set_halo(region.center_kpc, region.radius_kpc),
            RegionKind::Disk => {
                self.set_disk(region.center_kpc, region.radius_kpc, region.height_kpc)
            }
        }
    }

    /// Restricts aggregation to a halo-centered sphere. Only the first
    /// `set_halo`/`set_disk` call takes effect.
    pub fn set_halo(&mut self, center_kpc: Option<[f64; 3]>, radius_kpc: f64) {
        self.state
            .set_region(RegionSelector::HaloSphere { center_kpc, radius_kpc });
    }

    /// Restricts aggregation to a disk-centered cylinder. Only the first
    /// `set_halo`/`set_disk` call takes effect.
    pub fn set_disk(&mut self, center_kpc: Option<[f64; 3]>, radius_kpc: f64, height_kpc: f64) {
        self.state.set_region(RegionSelector::DiskCylinder {
            center_kpc,
            radius_kpc,
            height_kpc,
        });
    }

    /// Loads all remaining snapshots, `increment` per batch, persisting the cache
    /// after every batch. Stops early with a warning if a full pass over the range
    /// makes no progress (every remaining snapshot missing or unreadable); calling
    /// again retries those slots.
    pub fn load(&mut self, increment: usize) -> Result<()> {
        if self.state.is_complete() {
            return Ok(());
        }
        while !self.state.is_complete() {
            let processed = self.state.load_batch(&self.reader, increment, &self.constants)?;
            self.save()?;
            if processed == 0 && !self.state.is_complete() {
                let remaining = self.state.loaded_flags().iter().filter(|&&l| !l).count();
                warn!(
                    "No progress over a full pass; {remaining} snapshot(s) remain unreadable. \
                     Run again to retry them."
                );
                break;
            }
        }
        Ok(())
    }

    /// Persists the current aggregation state to the cache file.
    pub fn save(&self) -> Result<()> {
        self.state.persist(&self.cache_path)
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn state(&self) -> &EvoState {
        &self.state
    }

    /// Returns a defensive copy of the requested series. Derived source/species
    /// fractions with `Statistic::Total` are computed on the fly from the stored
    /// totals, with non-finite ratios coerced to zero; with `Statistic::Median`
    /// they map to the stored `dz_*` series.
    pub fn get_data(
        &self,
        name: DataName,
        subsample: Subsample,
        statistic: Statistic,
    ) -> Result<Vec<f64>> {
        if !self.state.all_loaded {
            warn!("Not all snapshots have been loaded! All unloaded values will be zero!");
        }
        match name {
            DataName::Time => Ok(self.state.time.clone()),
            DataName::Redshift => {
                if !self.state.cosmological {
                    bail!("Redshift is only tracked for cosmological runs.");
                }
                Ok(self.state.redshift.clone())
            }
            DataName::Total(q) => self.total_series(q),
            DataName::Median(q) => self.median_series(subsample, q),
            DataName::Star(q) => self
                .state
                .star_totals
                .get(&q)
                .cloned()
                .ok_or_else(|| anyhow!("Star quantity '{q}' is not tracked.")),
            DataName::SourceFraction(src) => match statistic {
                Statistic::Total => {
                    let num = self.total_series(TotalQuantity::SourceMass(src))?;
                    let den = self.total_series(TotalQuantity::DustMass)?;
                    Ok(ratio_series(&num, &den))
                }
                Statistic::Median => {
                    self.median_series(subsample, MedianQuantity::SourceToMetals(src))
                }
            },
            DataName::SpeciesFraction(sp) => match statistic {
                Statistic::Total => {
                    let num = self.total_series(TotalQuantity::SpeciesMass(sp))?;
                    let den = self.total_series(TotalQuantity::DustMass)?;
                    Ok(ratio_series(&num, &den))
                }
                Statistic::Median => {
                    self.median_series(subsample, MedianQuantity::SpeciesToMetals(sp))
                }
            },
        }
    }

    fn total_series(&self, quantity: TotalQuantity) -> Result<Vec<f64>> {
        self.state
            .totals
            .get(&quantity)
            .cloned()
            .ok_or_else(|| anyhow!("Total quantity '{quantity}' is not tracked."))
    }

    fn median_series(&self, subsample: Subsample, quantity: MedianQuantity) -> Result<Vec<f64>> {
        let per_quantity = self
            .state
            .medians
            .get(&subsample)
            .ok_or_else(|| anyhow!("No data for median subsample '{subsample}' available."))?;
        per_quantity
            .get(&quantity)
            .cloned()
            .ok_or_else(|| anyhow!("Median quantity '{quantity}' is not tracked."))
    }
}

// Element-wise ratio with non-finite results (0/0, x/0) coerced to zero; these are
// display statistics, not correctness-critical values.
fn ratio_series(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator.iter())
        .map(|(&n, &d)| {
            let r = n / d;
            if r.is_finite() {
                r
            } else {
                0.0
            }
        })
        .collect()
}

// Cache file name derived from the snapshot directory and an optional label, one
// file per (directory, label) pair.
fn cache_file_name(snapshot_dir: &str, name_prefix: &str) -> String {
    let basename = Path::new(snapshot_dir.trim_end_matches(['/', '\\']))
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sim".to_string());
    if name_prefix.is_empty() {
        format!("dust_evo_{basename}_snaps.bin")
    } else {
        format!("dust_evo_{name_prefix}_{basename}_snaps.bin")
    }
}
