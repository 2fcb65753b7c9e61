//! Builders for in-memory ocean model output used by the collection tests.

#![allow(dead_code)]

use file_collection::{AttributeValue, ElementType, MemoryFile, MemoryStore};
use test_utils::{files, names, plane_values};

pub const NX: usize = 3;
pub const NY: usize = 2;
pub const FILL: f64 = -999.0;

/// Value stored at `(t, y, x)` of series file `file`.
pub fn series_value(file: usize, t: usize, y: usize, x: usize) -> f64 {
    (1000 * file + 100 * t + x + 10 * y) as f64
}

fn series_data(file: usize, nt: usize) -> Vec<f64> {
    (0..nt)
        .flat_map(|t| plane_values(NX, NY, (1000 * file + 100 * t) as f64))
        .collect()
}

/// One model output file: `temp(time, y, x)` with `nt` records and a
/// time-invariant `topo(y, x)`.
pub fn series_file(file: usize, nt: usize) -> MemoryFile {
    MemoryFile::new()
        .with_dimension(names::TIME_DIM, nt)
        .with_dimension(names::Y_DIM, NY)
        .with_dimension(names::X_DIM, NX)
        .with_variable(
            names::TEMPERATURE,
            &[names::TIME_DIM, names::Y_DIM, names::X_DIM],
            ElementType::Float,
            series_data(file, nt),
        )
        .with_attribute(names::TEMPERATURE, names::MISSING_VALUE_ATTR, AttributeValue::Floats(vec![FILL]))
        .with_attribute(names::TEMPERATURE, "units", AttributeValue::Text("degC".to_string()))
        .with_variable(
            names::TOPOGRAPHY,
            &[names::Y_DIM, names::X_DIM],
            ElementType::Float,
            plane_values(NX, NY, 0.0),
        )
        .with_global_attribute("title", AttributeValue::Text(format!("ocean {}", file)))
        .with_global_attribute("record", AttributeValue::Ints(vec![file as i64]))
}

/// Attach a 1-D time coordinate variable holding `times`.
pub fn with_time_coordinate(file: MemoryFile, times: &[f64]) -> MemoryFile {
    file.with_variable(names::TIME_COORD, &[names::TIME_DIM], ElementType::Double, times.to_vec())
}

/// The three series files with `nt` records each.
pub fn series_store(nt: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (index, path) in files::SERIES.iter().enumerate() {
        store.insert(*path, series_file(index, nt));
    }
    store
}

/// A 3D field `salt(z, y, x)` with `nz` levels and no time dimension.
pub fn volume_file(nz: usize) -> MemoryFile {
    let data = (0..nz)
        .flat_map(|z| plane_values(NX, NY, (100 * z) as f64))
        .collect();
    MemoryFile::new()
        .with_dimension(names::Z_DIM, nz)
        .with_dimension(names::Y_DIM, NY)
        .with_dimension(names::X_DIM, NX)
        .with_variable(
            names::SALINITY,
            &[names::Z_DIM, names::Y_DIM, names::X_DIM],
            ElementType::Float,
            data,
        )
        .with_variable(
            names::TOPOGRAPHY,
            &[names::Y_DIM, names::X_DIM],
            ElementType::Float,
            plane_values(NX, NY, 0.0),
        )
}
