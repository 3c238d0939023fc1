use crate::evolution::DustEvo;
use crate::quantities::{DataName, Statistic, Subsample};
use crate::reader::SnapshotReader;
use anyhow::Result;
use dust_common::config::AnalysisConfig;
use log::{error, info};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// All aggregated series of one run, flattened for export.
#[derive(Debug, Serialize)]
pub struct SeriesTable {
    /// Absolute snapshot indices, one per row.
    pub snapshots: Vec<usize>,
    pub columns: Vec<SeriesColumn>,
}

#[derive(Debug, Serialize)]
pub struct SeriesColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Collects every configured series (time, redshift, totals, star totals,
/// subsample medians, and the derived source/species dust fractions) into one
/// table.
pub fn build_table<R: SnapshotReader>(
    evo: &DustEvo<R>,
    config: &AnalysisConfig,
) -> Result<SeriesTable> {
    let (lo, hi) = evo.state().snap_range();
    let mut columns = Vec::new();
    let mut push = |name: String, values: Vec<f64>| {
        columns.push(SeriesColumn { name, values });
    };

    push(
        "time".to_string(),
        evo.get_data(DataName::Time, Subsample::All, Statistic::Total)?,
    );
    if config.simulation.cosmological {
        push(
            "redshift".to_string(),
            evo.get_data(DataName::Redshift, Subsample::All, Statistic::Total)?,
        );
    }

    for name in &config.quantities.totals {
        let data_name: DataName = name.parse()?;
        push(
            name.clone(),
            evo.get_data(data_name, Subsample::All, Statistic::Total)?,
        );
    }
    for name in &config.quantities.star_totals {
        let data_name: DataName = name.parse()?;
        push(
            name.clone(),
            evo.get_data(data_name, Subsample::All, Statistic::Total)?,
        );
    }

    // Unknown subsample names collapse onto "all"; emit each subsample only once.
    let mut subsamples: Vec<Subsample> = Vec::new();
    for name in &config.quantities.subsamples {
        let sub = Subsample::from_name(name);
        if !subsamples.contains(&sub) {
            subsamples.push(sub);
        }
    }
    for sub in &subsamples {
        for name in &config.quantities.medians {
            let data_name: DataName = name.parse()?;
            push(
                format!("{name}[{sub}]"),
                evo.get_data(data_name, *sub, Statistic::Median)?,
            );
        }
    }

    // Derived dust fractions, where the required totals are tracked.
    for name in [
        "source_acc", "source_SNeIa", "source_SNeII", "source_AGB", "spec_sil",
        "spec_carb", "spec_SiC", "spec_iron", "spec_ORes",
    ] {
        let data_name: DataName = name.parse()?;
        if let Ok(values) = evo.get_data(data_name, Subsample::All, Statistic::Total) {
            push(name.to_string(), values);
        }
    }

    Ok(SeriesTable {
        snapshots: (lo..=hi).collect(),
        columns,
    })
}

/// Writes the aggregated series in the configured format; unknown formats fall
/// back to CSV with an error log.
pub fn write_series<R: SnapshotReader>(evo: &DustEvo<R>, config: &AnalysisConfig) -> Result<()> {
    let table = build_table(evo, config)?;
    let base = &config.output.base_filename;
    let format = config.output.format.as_deref().unwrap_or("csv");

    match format {
        "csv" => write_csv(&table, &format!("{base}_series.csv"))?,
        "json" => {
            let filename = format!("{base}_series.json");
            let json_string = serde_json::to_string(&table)?;
            File::create(&filename)?.write_all(json_string.as_bytes())?;
            info!("Series saved to {filename}");
        }
        "bincode" => {
            let filename = format!("{base}_series.bin");
            bincode::serialize_into(File::create(&filename)?, &table)?;
            info!("Series saved to {filename} (binary format)");
        }
        "messagepack" => {
            let filename = format!("{base}_series.msgpack");
            rmp_serde::encode::write(&mut File::create(&filename)?, &table)?;
            info!("Series saved to {filename} (MessagePack format)");
        }
        other => {
            error!("Unknown output format: {other}. Using CSV instead.");
            write_csv(&table, &format!("{base}_series.csv"))?;
        }
    }
    Ok(())
}

fn write_csv(table: &SeriesTable, filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)?;
    let mut header = vec!["snap".to_string()];
    header.extend(table.columns.iter().map(|c| c.name.clone()));
    writer.write_record(&header)?;

    for (row, &snum) in table.snapshots.iter().enumerate() {
        let mut record = vec![snum.to_string()];
        record.extend(table.columns.iter().map(|c| format!("{:.6e}", c.values[row])));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("Series saved to {filename}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::DustEvo;
    use dust_common::snapshot::{
        GasParticles, SnapshotData, SnapshotHeader, StarParticles, ELEM_HE, ELEM_METALS,
        N_DUST_SOURCES, N_DUST_SPECIES, N_ELEMENTS,
    };
    use std::collections::HashMap;

    struct MockReader {
        snaps: HashMap<usize, SnapshotData>,
    }

    impl SnapshotReader for MockReader {
        fn read(&self, index: usize) -> Result<Option<SnapshotData>> {
            Ok(self.snaps.get(&index).cloned())
        }
    }

    fn one_particle_snapshot(time_gyr: f64) -> SnapshotData {
        let mut elem = [0.0; N_ELEMENTS];
        elem[ELEM_METALS] = 0.02;
        elem[ELEM_HE] = 0.28;
        SnapshotData {
            header: SnapshotHeader {
                time_gyr,
                redshift: 0.0,
                scale_factor: 1.0,
                box_size_kpc: 100.0,
                cosmological: false,
            },
            gas: GasParticles {
                positions: vec![[0.0; 3]],
                masses: vec![1.0e5],
                velocities: vec![[0.0; 3]],
                temperatures: vec![100.0],
                number_densities: vec![1.0],
                neutral_fractions: vec![0.9],
                molecular_fractions: vec![0.5],
                dense_fractions: vec![0.2],
                element_fractions: vec![elem],
                dust_element_fractions: vec![[0.001; N_ELEMENTS]],
                dust_mass_fractions: vec![0.01],
                species_fractions: vec![[0.002; N_DUST_SPECIES]],
                source_fractions: vec![[0.0025; N_DUST_SOURCES]],
                c_in_co_fractions: vec![0.001],
            },
            stars: StarParticles::default(),
        }
    }

    fn loaded_evo(tag: &str) -> (DustEvo<MockReader>, AnalysisConfig) {
        let cache_dir = std::env::temp_dir().join(format!("dust_evo_export_{tag}"));
        std::fs::remove_dir_all(&cache_dir).ok();
        let toml_str = format!(
            r#"
            [simulation]
            snapshot_dir = "/data/{tag}/output"
            snap_lo = 0
            snap_hi = 2

            [region]
            kind = "halo"
            center_kpc = [0.0, 0.0, 0.0]
            radius_kpc = 10.0

            [output]
            cache_dir = "{}"
            base_filename = "unused"
            "#,
            cache_dir.display()
        );
        let config: AnalysisConfig = toml::from_str(&toml_str).unwrap();
        let snaps = (0..=2).map(|i| (i, one_particle_snapshot(0.1 * i as f64))).collect();
        let mut evo = DustEvo::new(MockReader { snaps }, &config).unwrap();
        evo.set_region_from_config(&config);
        evo.load(5).unwrap();
        (evo, config)
    }

    #[test]
    fn table_has_one_row_per_snapshot_and_expected_columns() {
        let (evo, config) = loaded_evo("table");
        let table = build_table(&evo, &config).unwrap();
        assert_eq!(table.snapshots, vec![0, 1, 2]);
        for column in &table.columns {
            assert_eq!(column.values.len(), 3, "column {}", column.name);
        }
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"time"));
        assert!(names.contains(&"M_dust"));
        assert!(names.contains(&"sfr"));
        assert!(names.contains(&"D/Z[cold]"));
        assert!(names.contains(&"source_acc"));
        // Non-cosmological run: no redshift column.
        assert!(!names.contains(&"redshift"));
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let (evo, config) = loaded_evo("csv");
        let table = build_table(&evo, &config).unwrap();
        let path = std::env::temp_dir().join("dust_evo_export_csv_series.csv");
        write_csv(&table, path.to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 snapshots
        assert!(lines[0].starts_with("snap,time,"));
        std::fs::remove_file(path).ok();
    }
}
