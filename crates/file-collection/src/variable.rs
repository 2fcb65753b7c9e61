//! A variable whose timesteps are spread over several files.

use std::fmt;

use crate::error::{CollectionError, Result};
use crate::reader::{ElementType, SimpleReader, VariableInfo};
use crate::time_axis::{TimeAxis, TimeKey};

/// Where one timestep of a variable lives.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepEntry {
    /// Index into [`TimeVaryingVar::files`].
    pub file_index: usize,
    pub time: f64,
    /// Timestep within that file.
    pub local_time_step: usize,
}

/// One variable of a collection, merged across every file defining it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeVaryingVar {
    info: Option<VariableInfo>,
    spatial_dims: Vec<usize>,
    spatial_dim_names: Vec<String>,
    time_dim_name: Option<String>,
    files: Vec<String>,
    entries: Vec<TimeStepEntry>,
}

impl TimeVaryingVar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the definition of `variable` found in `file`.
    ///
    /// The first insert fixes the variable's shape and type; later inserts
    /// must agree on dimension names and element type. Every time listed
    /// for the variable in `axis` becomes one timestep. Nothing is modified
    /// when an error is returned.
    pub fn insert(&mut self, reader: &dyn SimpleReader, variable: &VariableInfo, file: &str, axis: &TimeAxis) -> Result<()> {
        let mut dim_names = variable.dim_names.clone();
        let mut dims = dim_names
            .iter()
            .map(|name| {
                reader.dim_len(name).ok_or_else(|| {
                    CollectionError::invariant(format!("{}: {} uses undefined dimension {}", file, variable.name, name))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        let declared = axis.declared_time_dims();
        let mut time_dim_name = None;
        if let Some(first) = variable.dim_names.first() {
            if axis.is_derived() {
                time_dim_name = declared.first().cloned();
            } else if declared.contains(first) {
                time_dim_name = Some(first.clone());
                dim_names.remove(0);
                dims.remove(0);
            }
        }

        if let Some(existing) = &self.info {
            if existing.dim_names != variable.dim_names || existing.xtype != variable.xtype {
                return Err(CollectionError::conflict(format!(
                    "{} in {}: {:?} {} differs from {:?} {}",
                    variable.name, file, variable.dim_names, variable.xtype, existing.dim_names, existing.xtype
                )));
            }
        }

        let key = match &time_dim_name {
            None => TimeKey::Constant,
            Some(_) if axis.organization().keys_by_dimension() => TimeKey::FileDimension {
                file: file.to_string(),
                dimension: variable.dim_names[0].clone(),
            },
            Some(_) => TimeKey::FileVariable {
                file: file.to_string(),
                variable: variable.name.clone(),
            },
        };
        let times = axis
            .times_for(&key)
            .ok_or_else(|| CollectionError::not_found(format!("no times for {}", key)))?;

        if self.info.is_none() {
            self.info = Some(variable.clone());
            self.spatial_dims = dims;
            self.spatial_dim_names = dim_names;
            self.time_dim_name = time_dim_name;
        }

        self.files.push(file.to_string());
        let file_index = self.files.len() - 1;
        self.entries.extend(times.iter().enumerate().map(|(local_time_step, &time)| TimeStepEntry {
            file_index,
            time,
            local_time_step,
        }));

        Ok(())
    }

    /// Order timesteps by time; entries with equal times keep their
    /// insertion order.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Variable-local timestep holding exactly `time`. Time-invariant
    /// variables always answer 0.
    pub fn time_step(&self, time: f64) -> Result<usize> {
        if !self.is_time_varying() {
            return Ok(0);
        }
        self.entries
            .iter()
            .position(|entry| entry.time == time)
            .ok_or_else(|| CollectionError::not_found(format!("{} has no timestep at time {}", self.name(), time)))
    }

    pub fn time(&self, var_ts: usize) -> Option<f64> {
        self.entries.get(var_ts).map(|entry| entry.time)
    }

    pub fn times(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.time).collect()
    }

    /// Timestep within the file holding `var_ts`.
    pub fn local_time_step(&self, var_ts: usize) -> Option<usize> {
        self.entries.get(var_ts).map(|entry| entry.local_time_step)
    }

    /// File holding `var_ts`.
    pub fn file(&self, var_ts: usize) -> Option<&str> {
        self.entries
            .get(var_ts)
            .and_then(|entry| self.files.get(entry.file_index))
            .map(String::as_str)
    }

    pub fn num_time_steps(&self) -> usize {
        self.entries.len()
    }

    /// First value of the attribute `attr`, if the variable has it.
    pub fn missing_value(&self, attr: &str) -> Option<f64> {
        if attr.is_empty() {
            return None;
        }
        self.info.as_ref()?.att_f64s(attr).first().copied()
    }

    pub fn name(&self) -> &str {
        self.info.as_ref().map(|info| info.name.as_str()).unwrap_or_default()
    }

    /// Definition from the first successful insert.
    pub fn info(&self) -> Option<&VariableInfo> {
        self.info.as_ref()
    }

    pub fn xtype(&self) -> Option<ElementType> {
        self.info.as_ref().map(|info| info.xtype)
    }

    /// Dimension lengths without the time dimension.
    pub fn spatial_dims(&self) -> &[usize] {
        &self.spatial_dims
    }

    pub fn spatial_dim_names(&self) -> &[String] {
        &self.spatial_dim_names
    }

    pub fn time_dim_name(&self) -> Option<&str> {
        self.time_dim_name.as_deref()
    }

    pub fn is_time_varying(&self) -> bool {
        self.time_dim_name.is_some()
    }

    /// Files in insertion order, one per successful insert.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn entries(&self) -> &[TimeStepEntry] {
        &self.entries
    }
}

impl fmt::Display for TimeVaryingVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable {}", self.name())?;
        writeln!(f, " Files: {}", self.files.join(" "))?;
        writeln!(f, " Dims: {:?}", self.spatial_dims)?;
        writeln!(f, " Dim Names: {}", self.spatial_dim_names.join(" "))?;
        writeln!(f, " Time Varying: {}", self.is_time_varying())?;
        if let Some(name) = &self.time_dim_name {
            writeln!(f, " Time Dim: {}", name)?;
        }
        for entry in &self.entries {
            writeln!(
                f,
                "  file {} time {} local {}",
                entry.file_index, entry.time, entry.local_time_step
            )?;
        }
        Ok(())
    }
}
