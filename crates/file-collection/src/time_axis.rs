//! Reconciliation of per-file time information into one global time axis.
//!
//! Three file organizations are supported:
//!
//! - [`FileOrganization::Implicit`]: no time dimension is named. With two or
//!   more files, each file is one timestep (`0, 1, 2, ...` per variable) and
//!   a synthetic [`DERIVED_TIME_DIM`] dimension of length `files.len()` is
//!   declared.
//! - [`FileOrganization::DeclaredDim`]: time dimensions are named but carry
//!   no coordinate values. Each variable whose slowest dimension is a time
//!   dimension gets consecutive integer times across the files.
//! - [`FileOrganization::DeclaredDimWithCoordVar`]: each time dimension has a
//!   1-D coordinate variable holding the actual times. A coordinate variable
//!   found in only one file applies to every file.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{CollectionError, Result};
use crate::reader::{ReaderMap, SimpleReader};

/// Name of the synthesized time dimension in the implicit organization.
pub const DERIVED_TIME_DIM: &str = "derived_time";

/// How time is encoded across the files of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileOrganization {
    #[default]
    Implicit,
    DeclaredDim {
        time_dims: Vec<String>,
    },
    DeclaredDimWithCoordVar {
        time_dims: Vec<String>,
        coord_vars: Vec<String>,
    },
}

impl FileOrganization {
    /// Pick the organization from the names supplied by the caller.
    ///
    /// Coordinate variables must pair up one-to-one with time dimensions.
    pub fn from_names(time_dims: &[&str], coord_vars: &[&str]) -> Result<Self> {
        if !coord_vars.is_empty() && coord_vars.len() != time_dims.len() {
            return Err(CollectionError::configuration(format!(
                "{} time coordinate variables for {} time dimensions",
                coord_vars.len(),
                time_dims.len()
            )));
        }

        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        Ok(if time_dims.is_empty() {
            FileOrganization::Implicit
        } else if coord_vars.is_empty() {
            FileOrganization::DeclaredDim {
                time_dims: owned(time_dims),
            }
        } else {
            FileOrganization::DeclaredDimWithCoordVar {
                time_dims: owned(time_dims),
                coord_vars: owned(coord_vars),
            }
        })
    }

    /// Time dimension names given by the caller.
    pub fn time_dims(&self) -> &[String] {
        match self {
            FileOrganization::Implicit => &[],
            FileOrganization::DeclaredDim { time_dims } => time_dims,
            FileOrganization::DeclaredDimWithCoordVar { time_dims, .. } => time_dims,
        }
    }

    /// Times of a variable are keyed by its name in the first two
    /// organizations and by its time dimension in the third.
    pub fn keys_by_dimension(&self) -> bool {
        matches!(self, FileOrganization::DeclaredDimWithCoordVar { .. })
    }
}

/// Key of the per-file time table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey {
    /// Every time of the collection; used by time-invariant variables.
    Constant,
    FileVariable { file: String, variable: String },
    FileDimension { file: String, dimension: String },
}

impl TimeKey {
    /// File the key belongs to. `None` for [`TimeKey::Constant`].
    pub fn file(&self) -> Option<&str> {
        match self {
            TimeKey::Constant => None,
            TimeKey::FileVariable { file, .. } | TimeKey::FileDimension { file, .. } => Some(file),
        }
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Constant => write!(f, "constant"),
            TimeKey::FileVariable { file, variable } => write!(f, "{}:{}", file, variable),
            TimeKey::FileDimension { file, dimension } => write!(f, "{}:{}", file, dimension),
        }
    }
}

/// The reconciled time axis and the per-file time table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeAxis {
    times: Vec<f64>,
    times_map: BTreeMap<TimeKey, Vec<f64>>,
    time_dim_lens: BTreeMap<String, usize>,
    organization: FileOrganization,
}

/// Sort ascending and drop exact duplicates.
pub(crate) fn sort_unique(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup();
}

impl TimeAxis {
    /// Build the time table for `files`, whose readers must already be open
    /// in `readers`.
    pub fn build(files: &[String], readers: &mut ReaderMap, organization: FileOrganization) -> Result<Self> {
        let mut axis = TimeAxis {
            organization,
            ..Default::default()
        };

        match axis.organization.clone() {
            FileOrganization::Implicit => axis.build_implicit(files, readers)?,
            FileOrganization::DeclaredDim { time_dims } => axis.build_declared(files, readers, &time_dims)?,
            FileOrganization::DeclaredDimWithCoordVar { coord_vars, .. } => {
                axis.build_coordinates(files, readers, &coord_vars)?
            }
        }

        let mut times: Vec<f64> = axis.times_map.values().flatten().copied().collect();
        sort_unique(&mut times);
        if times.is_empty() {
            times.push(0.0);
        }
        axis.times_map.insert(TimeKey::Constant, times.clone());
        axis.times = times;

        debug!(
            files = files.len(),
            times = axis.times.len(),
            keys = axis.times_map.len(),
            "Built time axis"
        );

        Ok(axis)
    }

    fn build_implicit(&mut self, files: &[String], readers: &ReaderMap) -> Result<()> {
        if files.len() < 2 {
            return Ok(());
        }

        let mut counters: BTreeMap<String, f64> = BTreeMap::new();
        for file in files {
            let reader = reader_for(readers, file)?;
            for variable in reader.variables().iter().filter(|v| !v.dim_names.is_empty()) {
                let counter = counters.entry(variable.name.clone()).or_insert(0.0);
                self.times_map.insert(
                    TimeKey::FileVariable {
                        file: file.clone(),
                        variable: variable.name.clone(),
                    },
                    vec![*counter],
                );
                *counter += 1.0;
            }
        }

        self.time_dim_lens.insert(DERIVED_TIME_DIM.to_string(), files.len());
        Ok(())
    }

    fn build_declared(&mut self, files: &[String], readers: &ReaderMap, time_dims: &[String]) -> Result<()> {
        let mut counters: BTreeMap<String, usize> = BTreeMap::new();
        let mut dim_times: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for file in files {
            let reader = reader_for(readers, file)?;
            for variable in reader.variables() {
                let Some(time_dim) = variable.dim_names.first() else {
                    continue;
                };
                if !time_dims.contains(time_dim) {
                    continue;
                }

                let len = reader.dim_len(time_dim).ok_or_else(|| {
                    CollectionError::invariant(format!("{}: undefined dimension {}", file, time_dim))
                })?;
                let counter = counters.entry(variable.name.clone()).or_insert(0);
                let times: Vec<f64> = (*counter..*counter + len).map(|t| t as f64).collect();
                *counter += len;

                dim_times.entry(time_dim.clone()).or_default().extend(&times);
                self.times_map.insert(
                    TimeKey::FileVariable {
                        file: file.clone(),
                        variable: variable.name.clone(),
                    },
                    times,
                );
            }
        }

        for (dim, mut times) in dim_times {
            sort_unique(&mut times);
            self.time_dim_lens.insert(dim, times.len());
        }
        Ok(())
    }

    fn build_coordinates(&mut self, files: &[String], readers: &mut ReaderMap, coord_vars: &[String]) -> Result<()> {
        let mut occurrences: BTreeMap<&str, (usize, TimeKey)> = BTreeMap::new();
        let mut dim_times: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for file in files {
            let reader = readers
                .get_mut(file)
                .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", file)))?;

            for coord_var in coord_vars {
                let Some(info) = reader.variable(coord_var).cloned() else {
                    continue;
                };
                let [time_dim] = info.dim_names.as_slice() else {
                    return Err(CollectionError::configuration(format!(
                        "{}: time coordinate variable {} must be 1D",
                        file, coord_var
                    )));
                };
                let time_dim = time_dim.clone();

                let len = reader.dim_len(&time_dim).unwrap_or(0);
                let mut values = vec![0.0; len];
                let handle = reader.open_read(&info)?;
                let read = reader.read(handle, &[0], &[len], &mut values);
                reader.close(handle)?;
                read?;

                let key = TimeKey::FileDimension {
                    file: file.clone(),
                    dimension: time_dim.clone(),
                };
                let entry = occurrences.entry(coord_var.as_str()).or_insert((0, key.clone()));
                entry.0 += 1;

                dim_times.entry(time_dim).or_default().extend(&values);
                self.times_map.entry(key).or_default().extend(values);
            }
        }

        for (dim, mut times) in dim_times {
            sort_unique(&mut times);
            self.time_dim_lens.insert(dim, times.len());
        }

        // a coordinate variable stored once applies to every file
        for (count, key) in occurrences.into_values() {
            let TimeKey::FileDimension { dimension, .. } = &key else {
                continue;
            };
            if count != 1 {
                continue;
            }
            let shared = self.times_map.get(&key).cloned().unwrap_or_default();
            for file in files {
                self.times_map.insert(
                    TimeKey::FileDimension {
                        file: file.clone(),
                        dimension: dimension.clone(),
                    },
                    shared.clone(),
                );
            }
        }

        Ok(())
    }

    /// Sorted, de-duplicated union of all times; `[0.0]` when no file
    /// carries time.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn time(&self, ts: usize) -> Option<f64> {
        self.times.get(ts).copied()
    }

    pub fn num_time_steps(&self) -> usize {
        self.times.len()
    }

    pub fn times_for(&self, key: &TimeKey) -> Option<&[f64]> {
        self.times_map.get(key).map(Vec::as_slice)
    }

    pub fn times_map(&self) -> &BTreeMap<TimeKey, Vec<f64>> {
        &self.times_map
    }

    /// Number of distinct times per time dimension.
    pub fn time_dim_lens(&self) -> &BTreeMap<String, usize> {
        &self.time_dim_lens
    }

    pub fn organization(&self) -> &FileOrganization {
        &self.organization
    }

    /// Time dimensions variables are matched against: the caller's names, or
    /// the synthetic dimension when the implicit organization produced one.
    pub fn declared_time_dims(&self) -> Vec<String> {
        match self.organization {
            FileOrganization::Implicit if self.time_dim_lens.contains_key(DERIVED_TIME_DIM) => {
                vec![DERIVED_TIME_DIM.to_string()]
            }
            _ => self.organization.time_dims().to_vec(),
        }
    }

    /// True when time is synthesized from the file sequence.
    pub fn is_derived(&self) -> bool {
        matches!(self.organization, FileOrganization::Implicit) && self.time_dim_lens.contains_key(DERIVED_TIME_DIM)
    }

    /// First file whose time table holds `time`.
    pub fn file_for_time(&self, time: f64) -> Option<&str> {
        self.times_map
            .iter()
            .filter(|(key, _)| **key != TimeKey::Constant)
            .find(|(_, times)| times.contains(&time))
            .and_then(|(key, _)| key.file())
    }
}

fn reader_for<'a>(readers: &'a ReaderMap, file: &str) -> Result<&'a dyn SimpleReader> {
    readers
        .get(file)
        .map(|reader| reader.as_ref())
        .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryFile, MemoryStore};
    use crate::reader::{ElementType, ReaderFactory};

    fn open_all(store: &MemoryStore, files: &[&str]) -> (Vec<String>, ReaderMap) {
        let mut readers = ReaderMap::new();
        for file in files {
            readers.insert(file.to_string(), store.open(file).unwrap());
        }
        (files.iter().map(|f| f.to_string()).collect(), readers)
    }

    fn plane() -> MemoryFile {
        MemoryFile::new()
            .with_dimension("y", 2)
            .with_dimension("x", 2)
            .with_variable("temp", &["y", "x"], ElementType::Float, vec![0.0; 4])
            .with_variable("scalar", &[], ElementType::Double, vec![1.0])
    }

    #[test]
    fn test_from_names() {
        assert_eq!(FileOrganization::from_names(&[], &[]).unwrap(), FileOrganization::Implicit);
        assert!(matches!(
            FileOrganization::from_names(&["time"], &[]).unwrap(),
            FileOrganization::DeclaredDim { .. }
        ));
        let org = FileOrganization::from_names(&["time"], &["time"]).unwrap();
        assert!(org.keys_by_dimension());
        assert_eq!(org.time_dims(), &["time".to_string()]);
    }

    #[test]
    fn test_count_mismatch_is_configuration_error() {
        let err = FileOrganization::from_names(&["time"], &["t1", "t2"]).unwrap_err();
        assert!(matches!(err, CollectionError::Configuration(_)));
        assert!(FileOrganization::from_names(&[], &["t"]).is_err());
    }

    #[test]
    fn test_implicit_single_file_has_no_time() {
        let store = MemoryStore::new().with_file("a.nc", plane());
        let (files, mut readers) = open_all(&store, &["a.nc"]);
        let axis = TimeAxis::build(&files, &mut readers, FileOrganization::Implicit).unwrap();

        assert_eq!(axis.times(), &[0.0]);
        assert!(axis.declared_time_dims().is_empty());
        assert!(!axis.is_derived());
        assert_eq!(axis.times_for(&TimeKey::Constant), Some(&[0.0][..]));
    }

    #[test]
    fn test_implicit_counts_files() {
        let store = MemoryStore::new()
            .with_file("a.nc", plane())
            .with_file("b.nc", plane())
            .with_file("c.nc", plane());
        let (files, mut readers) = open_all(&store, &["a.nc", "b.nc", "c.nc"]);
        let axis = TimeAxis::build(&files, &mut readers, FileOrganization::Implicit).unwrap();

        assert_eq!(axis.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(axis.time_dim_lens().get(DERIVED_TIME_DIM), Some(&3));
        assert_eq!(axis.declared_time_dims(), vec![DERIVED_TIME_DIM.to_string()]);
        let key = TimeKey::FileVariable {
            file: "c.nc".to_string(),
            variable: "temp".to_string(),
        };
        assert_eq!(axis.times_for(&key), Some(&[2.0][..]));
        // scalars carry no time
        assert!(axis
            .times_map()
            .keys()
            .all(|k| !matches!(k, TimeKey::FileVariable { variable, .. } if variable == "scalar")));
        assert_eq!(axis.file_for_time(1.0), Some("b.nc"));
    }

    #[test]
    fn test_key_display() {
        let key = TimeKey::FileDimension {
            file: "a.nc".to_string(),
            dimension: "time".to_string(),
        };
        assert_eq!(key.to_string(), "a.nc:time");
        assert_eq!(TimeKey::Constant.to_string(), "constant");
        assert_eq!(TimeKey::Constant.file(), None);
    }

    #[test]
    fn test_sort_unique() {
        let mut values = vec![3.0, 1.0, 3.0, 2.0, 1.0];
        sort_unique(&mut values);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
