//! Multi-file collection of time-varying variables.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::AsPrimitive;
use tracing::{debug, info, warn};

use crate::config::CollectionConfig;
use crate::error::{CollectionError, Result};
use crate::handles::HandlePool;
use crate::reader::{
    find_attribute, Attribute, AttributeValue, ElementType, ReaderFactory, ReaderHandle, ReaderMap,
    SimpleReader, VariableInfo,
};
use crate::time_axis::{FileOrganization, TimeAxis, DERIVED_TIME_DIM};
use crate::variable::TimeVaryingVar;

/// A dimension seen in the files of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDimension {
    pub name: String,
    /// Length in the first file defining it.
    pub len: usize,
    /// The length differs between files.
    pub time_varying: bool,
}

/// A variable definition that could not be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedVariable {
    pub file: String,
    pub variable: String,
    pub error: CollectionError,
}

impl fmt::Display for FailedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.variable)
    }
}

/// Outcome of [`Collection::read_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceStatus {
    /// A plane was read and the cursor advanced.
    Read,
    /// The cursor is past the last plane.
    Exhausted,
}

/// Origin for [`Collection::seek_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl TryFrom<i32> for Whence {
    type Error = CollectionError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            other => Err(CollectionError::configuration(format!("invalid whence {}", other))),
        }
    }
}

/// State behind a read handle.
#[derive(Debug)]
struct OpenVariable {
    variable: TimeVaryingVar,
    file: String,
    local_time_step: usize,
    slice: usize,
    missing_value: Option<f64>,
    reader_handle: ReaderHandle,
    scratch: Vec<f64>,
}

/// Presents the variables of many files as one time series per variable.
///
/// Files are opened through a [`ReaderFactory`]. After
/// [`Collection::initialize`] every variable is addressed by name and
/// global timestep; reads go through integer handles.
pub struct Collection {
    factory: Box<dyn ReaderFactory>,
    readers: ReaderMap,
    files: Vec<String>,
    axis: TimeAxis,
    variables: BTreeMap<String, TimeVaryingVar>,
    dimensions: Vec<CollectionDimension>,
    failed: Vec<FailedVariable>,
    missing_value_attribute: String,
    handles: HandlePool<OpenVariable>,
}

impl Collection {
    pub fn new(factory: impl ReaderFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            readers: ReaderMap::new(),
            files: Vec::new(),
            axis: TimeAxis::default(),
            variables: BTreeMap::new(),
            dimensions: Vec::new(),
            failed: Vec::new(),
            missing_value_attribute: String::new(),
            handles: HandlePool::new(),
        }
    }

    /// Open `files` and merge their variables.
    ///
    /// `time_dims` names the dimensions representing time and
    /// `time_coordvars` the 1-D variables holding their values; see
    /// [`FileOrganization`]. Variables that cannot be merged are skipped and
    /// listed by [`Collection::failed_variables`]. On error the collection is
    /// left empty.
    pub fn initialize(&mut self, files: &[&str], time_dims: &[&str], time_coordvars: &[&str]) -> Result<()> {
        self.reinitialize();
        let result = self.load(files, time_dims, time_coordvars);
        if let Err(err) = &result {
            warn!(error = %err, files = files.len(), "Collection initialization failed");
            self.reinitialize();
        }
        result
    }

    /// [`Collection::initialize`] with names taken from `config`, which also
    /// sets the missing value attribute.
    pub fn initialize_with_config(&mut self, files: &[&str], config: &CollectionConfig) -> Result<()> {
        config.validate().map_err(CollectionError::configuration)?;

        let time_dims: Vec<&str> = config.time_dimensions.iter().map(String::as_str).collect();
        let coordvars: Vec<&str> = config.time_coordinate_variables.iter().map(String::as_str).collect();
        self.initialize(files, &time_dims, &coordvars)?;
        self.set_missing_value_attribute(&config.missing_value_attribute);
        Ok(())
    }

    /// Close every handle and forget all files and variables.
    pub fn reinitialize(&mut self) {
        for (id, open) in self.handles.drain() {
            if let Some(reader) = self.readers.get_mut(&open.file) {
                if let Err(err) = reader.close(open.reader_handle) {
                    warn!(handle = id, error = %err, "Failed to close reader handle");
                }
            }
        }
        self.readers.clear();
        self.files.clear();
        self.axis = TimeAxis::default();
        self.variables.clear();
        self.dimensions.clear();
        self.failed.clear();
    }

    fn load(&mut self, files: &[&str], time_dims: &[&str], time_coordvars: &[&str]) -> Result<()> {
        let organization = FileOrganization::from_names(time_dims, time_coordvars)?;

        for &file in files {
            if !self.readers.contains_key(file) {
                let reader = self.factory.open(file)?;
                self.readers.insert(file.to_string(), reader);
            }
        }
        self.files = files.iter().map(|f| f.to_string()).collect();

        let axis = TimeAxis::build(&self.files, &mut self.readers, organization)?;

        for (name, &len) in axis.time_dim_lens() {
            self.dimensions.push(CollectionDimension {
                name: name.clone(),
                len,
                time_varying: false,
            });
        }

        for file in &self.files {
            let reader: &dyn SimpleReader = self
                .readers
                .get(file)
                .map(|reader| reader.as_ref())
                .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", file)))?;

            for dim in reader.dimensions() {
                if axis.time_dim_lens().contains_key(&dim.name) {
                    continue;
                }
                match self.dimensions.iter_mut().find(|d| d.name == dim.name) {
                    Some(existing) if existing.len != dim.len => existing.time_varying = true,
                    Some(_) => {}
                    None => self.dimensions.push(CollectionDimension {
                        name: dim.name.clone(),
                        len: dim.len,
                        time_varying: false,
                    }),
                }
            }

            for variable in reader.variables() {
                let merged = self.variables.entry(variable.name.clone()).or_default();
                if let Err(error) = merged.insert(reader, variable, file, &axis) {
                    warn!(file = %file, variable = %variable.name, error = %error, "Skipping variable");
                    self.failed.push(FailedVariable {
                        file: file.clone(),
                        variable: variable.name.clone(),
                        error,
                    });
                }
            }
        }

        // a variable whose first definition failed has no shape
        self.variables.retain(|_, var| var.info().is_some());
        for var in self.variables.values_mut() {
            var.sort();
        }

        info!(
            files = self.files.len(),
            variables = self.variables.len(),
            times = axis.num_time_steps(),
            failed = self.failed.len(),
            "Initialized collection"
        );

        self.axis = axis;
        Ok(())
    }

    /// Definitions skipped during the last initialization.
    pub fn failed_variables(&self) -> &[FailedVariable] {
        &self.failed
    }

    /// Files of the last initialization, in the order given.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn time_axis(&self) -> &TimeAxis {
        &self.axis
    }

    fn var(&self, name: &str) -> Result<&TimeVaryingVar> {
        self.variables
            .get(name)
            .ok_or_else(|| CollectionError::not_found(format!("variable {}", name)))
    }

    pub fn variable(&self, name: &str) -> Option<&TimeVaryingVar> {
        self.variables.get(name)
    }

    // ---------------------------------------------------------------------
    // Catalog
    // ---------------------------------------------------------------------

    pub fn variable_exists(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// True when `name` has data at global timestep `ts`.
    pub fn variable_exists_at(&self, ts: usize, name: &str) -> bool {
        let (Some(time), Some(var)) = (self.axis.time(ts), self.variables.get(name)) else {
            return false;
        };
        !var.is_time_varying() || var.times().contains(&time)
    }

    /// Names of variables with `ndims` dimensions. With `spatial` only
    /// spatial dimensions count; otherwise the time dimension does too.
    pub fn variable_names(&self, ndims: usize, spatial: bool) -> Vec<String> {
        self.variables
            .iter()
            .filter(|(_, var)| {
                let n = var.spatial_dims().len() + usize::from(!spatial && var.is_time_varying());
                n == ndims
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn spatial_dims(&self, name: &str) -> Option<&[usize]> {
        self.variables.get(name).map(TimeVaryingVar::spatial_dims)
    }

    pub fn spatial_dim_names(&self, name: &str) -> Option<&[String]> {
        self.variables.get(name).map(TimeVaryingVar::spatial_dim_names)
    }

    /// Number of timesteps of `name`; 0 for unknown variables.
    pub fn time_dim(&self, name: &str) -> usize {
        self.variables.get(name).map_or(0, TimeVaryingVar::num_time_steps)
    }

    pub fn time_dim_name(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(TimeVaryingVar::time_dim_name)
    }

    /// Dimension lengths, slowest first, with the time dimension leading for
    /// time-varying variables.
    pub fn dims(&self, name: &str) -> Option<Vec<usize>> {
        let var = self.variables.get(name)?;
        let mut dims = Vec::with_capacity(var.spatial_dims().len() + 1);
        if var.is_time_varying() {
            dims.push(var.num_time_steps());
        }
        dims.extend_from_slice(var.spatial_dims());
        Some(dims)
    }

    pub fn dim_names(&self, name: &str) -> Option<Vec<String>> {
        let var = self.variables.get(name)?;
        let mut names: Vec<String> = var.time_dim_name().map(str::to_string).into_iter().collect();
        names.extend_from_slice(var.spatial_dim_names());
        Some(names)
    }

    pub fn is_time_varying(&self, name: &str) -> bool {
        self.variables.get(name).is_some_and(TimeVaryingVar::is_time_varying)
    }

    pub fn xtype(&self, name: &str) -> Option<ElementType> {
        self.variables.get(name).and_then(TimeVaryingVar::xtype)
    }

    /// Variable metadata with dimension names as the collection sees them.
    pub fn variable_info(&self, name: &str) -> Option<VariableInfo> {
        let var = self.variables.get(name)?;
        let mut info = var.info()?.clone();
        info.dim_names = self.dim_names(name)?;
        Some(info)
    }

    // ---------------------------------------------------------------------
    // Dimensions
    // ---------------------------------------------------------------------

    pub fn dimensions(&self) -> &[CollectionDimension] {
        &self.dimensions
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn dimension_lens(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.len).collect()
    }

    pub fn dimension_is_time_varying(&self, name: &str) -> bool {
        self.dimensions.iter().any(|d| d.name == name && d.time_varying)
    }

    /// Length of dimension `name` in the file holding global timestep `ts`.
    pub fn dim_length_at_time(&self, name: &str, ts: usize) -> Result<usize> {
        let time = self.time(ts)?;
        let file = self
            .axis
            .file_for_time(time)
            .ok_or_else(|| CollectionError::not_found(format!("no file holds time {}", time)))?;
        let reader = self
            .readers
            .get(file)
            .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", file)))?;
        reader
            .dim_len(name)
            .ok_or_else(|| CollectionError::not_found(format!("dimension {} in {}", name, file)))
    }

    // ---------------------------------------------------------------------
    // Time
    // ---------------------------------------------------------------------

    pub fn num_time_steps(&self) -> usize {
        self.axis.num_time_steps()
    }

    pub fn time(&self, ts: usize) -> Result<f64> {
        self.axis
            .time(ts)
            .ok_or_else(|| CollectionError::not_found(format!("timestep {}", ts)))
    }

    /// All times of the collection, ascending.
    pub fn times(&self) -> &[f64] {
        self.axis.times()
    }

    /// Times at which `name` has data; every time for time-invariant
    /// variables.
    pub fn times_for(&self, name: &str) -> Result<Vec<f64>> {
        let var = self.var(name)?;
        if var.is_time_varying() {
            Ok(var.times())
        } else {
            Ok(self.axis.times().to_vec())
        }
    }

    /// File and file-local timestep holding `name` at global timestep `ts`.
    pub fn file(&self, ts: usize, name: &str) -> Result<(&str, usize)> {
        let var = self.var(name)?;
        let var_ts = var.time_step(self.time(ts)?)?;
        let file = var
            .file(var_ts)
            .ok_or_else(|| CollectionError::invariant(format!("{}: timestep {} has no file", name, var_ts)))?;
        Ok((file, var.local_time_step(var_ts).unwrap_or(0)))
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Attributes of `name`, or the global attributes of the first file when
    /// `name` is empty.
    fn attributes(&self, name: &str) -> &[Attribute] {
        if name.is_empty() {
            return self
                .files
                .first()
                .and_then(|file| self.readers.get(file))
                .map(|reader| reader.global_attributes())
                .unwrap_or_default();
        }
        self.variables
            .get(name)
            .and_then(TimeVaryingVar::info)
            .map(|info| info.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn att_names(&self, name: &str) -> Vec<String> {
        self.attributes(name).iter().map(|a| a.name.clone()).collect()
    }

    pub fn att(&self, name: &str, att: &str) -> Option<&AttributeValue> {
        find_attribute(self.attributes(name), att)
    }

    pub fn att_type(&self, name: &str, att: &str) -> Option<ElementType> {
        self.att(name, att).map(AttributeValue::element_type)
    }

    pub fn att_f64s(&self, name: &str, att: &str) -> Vec<f64> {
        self.att(name, att).map(AttributeValue::as_f64s).unwrap_or_default()
    }

    pub fn att_i64s(&self, name: &str, att: &str) -> Vec<i64> {
        self.att(name, att).map(AttributeValue::as_i64s).unwrap_or_default()
    }

    pub fn att_text(&self, name: &str, att: &str) -> Option<&str> {
        self.att(name, att).and_then(AttributeValue::as_text)
    }

    // ---------------------------------------------------------------------
    // Missing values
    // ---------------------------------------------------------------------

    /// Attribute consulted for missing values; empty disables them.
    pub fn set_missing_value_attribute(&mut self, attr: &str) {
        self.missing_value_attribute = attr.to_string();
    }

    pub fn missing_value_attribute(&self) -> &str {
        &self.missing_value_attribute
    }

    pub fn missing_value(&self, name: &str) -> Result<Option<f64>> {
        Ok(self.var(name)?.missing_value(&self.missing_value_attribute))
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Open `name` at global timestep `ts` and return a handle.
    pub fn open_read(&mut self, ts: usize, name: &str) -> Result<usize> {
        let var = self.var(name)?;
        let time = self.time(ts)?;
        let var_ts = var.time_step(time)?;
        let file = var
            .file(var_ts)
            .ok_or_else(|| CollectionError::not_found(format!("{} at timestep {}", name, ts)))?
            .to_string();
        let local_time_step = var.local_time_step(var_ts).unwrap_or(0);
        let missing_value = var.missing_value(&self.missing_value_attribute);
        let info = var
            .info()
            .ok_or_else(|| CollectionError::invariant(format!("{} has no definition", name)))?
            .clone();
        let variable = var.clone();

        let reader = self
            .readers
            .get_mut(&file)
            .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", file)))?;
        let reader_handle = reader.open_read(&info)?;

        let id = self.handles.acquire(OpenVariable {
            variable,
            file,
            local_time_step,
            slice: 0,
            missing_value,
            reader_handle,
            scratch: Vec::new(),
        });
        debug!(handle = id, variable = name, ts, local_time_step, "Opened variable");
        Ok(id)
    }

    fn open(&self, handle: usize) -> Result<&OpenVariable> {
        self.handles
            .get(handle)
            .ok_or_else(|| CollectionError::not_found(format!("handle {}", handle)))
    }

    /// Missing value of the variable behind `handle`.
    pub fn handle_missing_value(&self, handle: usize) -> Result<Option<f64>> {
        Ok(self.open(handle)?.missing_value)
    }

    /// Read the spatial hyperslab `start..start + count` into `out`,
    /// converting to `T`.
    pub fn read<T>(&mut self, handle: usize, start: &[usize], count: &[usize], out: &mut [T]) -> Result<()>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let open = self
            .handles
            .get_mut(handle)
            .ok_or_else(|| CollectionError::not_found(format!("handle {}", handle)))?;
        let var = &open.variable;
        let rank = var.spatial_dims().len();
        if start.len() < rank || count.len() < rank {
            return Err(CollectionError::invariant(format!(
                "{} has {} spatial dimensions, start/count have {}/{}",
                var.name(),
                rank,
                start.len(),
                count.len()
            )));
        }

        let mut file_start = Vec::with_capacity(rank + 1);
        let mut file_count = Vec::with_capacity(rank + 1);
        if var.time_dim_name().is_some_and(|name| name != DERIVED_TIME_DIM) {
            file_start.push(open.local_time_step);
            file_count.push(1);
        }
        file_start.extend_from_slice(&start[..rank]);
        file_count.extend_from_slice(&count[..rank]);

        let n: usize = count[..rank].iter().product();
        if out.len() < n {
            return Err(CollectionError::invariant(format!(
                "buffer holds {} values, {} requested",
                out.len(),
                n
            )));
        }

        let reader = self
            .readers
            .get_mut(&open.file)
            .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", open.file)))?;
        open.scratch.resize(n, 0.0);
        reader.read(open.reader_handle, &file_start, &file_count, &mut open.scratch)?;

        for (dst, &src) in out.iter_mut().zip(&open.scratch) {
            *dst = src.as_();
        }
        Ok(())
    }

    /// Read the whole variable at the handle's timestep (0 to 3 spatial
    /// dimensions).
    pub fn read_all<T>(&mut self, handle: usize, out: &mut [T]) -> Result<()>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let dims = self.open(handle)?.variable.spatial_dims().to_vec();
        if dims.len() > 3 {
            return Err(CollectionError::invariant(format!(
                "whole-variable reads support up to 3 dimensions, got {}",
                dims.len()
            )));
        }
        let start = vec![0; dims.len()];
        self.read(handle, &start, &dims, out)
    }

    /// Read the XY plane at the handle's slice cursor and advance it.
    pub fn read_slice<T>(&mut self, handle: usize, out: &mut [T]) -> Result<SliceStatus>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let open = self.open(handle)?;
        let dims = open.variable.spatial_dims();
        let (nz, ny, nx) = match *dims {
            [nz, ny, nx] => (nz, ny, nx),
            [ny, nx] => (1, ny, nx),
            _ => {
                return Err(CollectionError::invariant(format!(
                    "slice reads need 2 or 3 dimensions, {} has {}",
                    open.variable.name(),
                    dims.len()
                )))
            }
        };
        let slice = open.slice;
        if slice >= nz {
            return Ok(SliceStatus::Exhausted);
        }

        if dims.len() == 3 {
            self.read(handle, &[slice, 0, 0], &[1, ny, nx], out)?;
        } else {
            self.read(handle, &[0, 0], &[ny, nx], out)?;
        }

        if let Some(open) = self.handles.get_mut(handle) {
            open.slice += 1;
        }
        Ok(SliceStatus::Read)
    }

    /// Move the slice cursor. The result is clamped to the planes of the
    /// variable.
    pub fn seek_slice(&mut self, handle: usize, offset: i64, whence: Whence) -> Result<()> {
        let open = self
            .handles
            .get_mut(handle)
            .ok_or_else(|| CollectionError::not_found(format!("handle {}", handle)))?;
        let dims = open.variable.spatial_dims();
        let nz = if dims.len() == 3 { dims[0] as i64 } else { 1 };

        let target = match whence {
            Whence::Start => offset,
            Whence::Current => open.slice as i64 + offset,
            Whence::End => offset + nz - 1,
        };
        open.slice = target.clamp(0, (nz - 1).max(0)) as usize;
        Ok(())
    }

    /// Current slice cursor of `handle`.
    pub fn slice_position(&self, handle: usize) -> Result<usize> {
        Ok(self.open(handle)?.slice)
    }

    /// Release `handle`.
    pub fn close(&mut self, handle: usize) -> Result<()> {
        let open = self
            .handles
            .release(handle)
            .ok_or_else(|| CollectionError::not_found(format!("handle {}", handle)))?;
        let reader = self
            .readers
            .get_mut(&open.file)
            .ok_or_else(|| CollectionError::invariant(format!("no reader open for {}", open.file)))?;
        reader.close(open.reader_handle)?;
        debug!(handle, variable = open.variable.name(), "Closed variable");
        Ok(())
    }

    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("files", &self.files)
            .field("axis", &self.axis)
            .field("variables", &self.variables)
            .field("dimensions", &self.dimensions)
            .field("failed", &self.failed)
            .field("missing_value_attribute", &self.missing_value_attribute)
            .field("open_handles", &self.handles.len())
            .finish()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection")?;
        let times: Vec<String> = self.axis.times().iter().map(f64::to_string).collect();
        writeln!(f, " Times: {}", times.join(" "))?;
        writeln!(f, " Missing value attribute: {}", self.missing_value_attribute)?;
        for var in self.variables.values() {
            write!(f, "{}", var)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryFile, MemoryStore};

    fn store() -> MemoryStore {
        let file = |offset: f64| {
            MemoryFile::new()
                .with_dimension("time", 1)
                .with_dimension("y", 2)
                .with_dimension("x", 2)
                .with_variable(
                    "temp",
                    &["time", "y", "x"],
                    ElementType::Float,
                    vec![offset, offset + 1.0, offset + 2.0, offset + 3.0],
                )
        };
        MemoryStore::new()
            .with_file("a.nc", file(0.0))
            .with_file("b.nc", file(10.0))
    }

    #[test]
    fn test_whence_from_i32() {
        assert_eq!(Whence::try_from(0).unwrap(), Whence::Start);
        assert_eq!(Whence::try_from(2).unwrap(), Whence::End);
        assert!(matches!(Whence::try_from(3), Err(CollectionError::Configuration(_))));
    }

    #[test]
    fn test_empty_collection() {
        let collection = Collection::new(MemoryStore::new());
        assert_eq!(collection.num_time_steps(), 0);
        assert!(collection.variable_names(2, true).is_empty());
        assert!(!collection.variable_exists_at(0, "temp"));
        assert!(collection.time(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_open_read_close() {
        let mut collection = Collection::new(store());
        collection.initialize(&["a.nc", "b.nc"], &["time"], &[]).unwrap();

        let handle = collection.open_read(1, "temp").unwrap();
        let mut out = [0.0f32; 4];
        collection.read_all(handle, &mut out).unwrap();
        assert_eq!(out, [10.0, 11.0, 12.0, 13.0]);

        collection.close(handle).unwrap();
        assert_eq!(collection.open_handles(), 0);
        assert!(collection.close(handle).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reinitialize_closes_handles() {
        let mut collection = Collection::new(store());
        collection.initialize(&["a.nc", "b.nc"], &["time"], &[]).unwrap();
        collection.open_read(0, "temp").unwrap();
        collection.reinitialize();

        assert_eq!(collection.open_handles(), 0);
        assert!(!collection.variable_exists("temp"));
        assert!(collection.files().is_empty());
    }

    #[test]
    fn test_failed_variable_display() {
        let failed = FailedVariable {
            file: "a.nc".to_string(),
            variable: "temp".to_string(),
            error: CollectionError::conflict("x"),
        };
        assert_eq!(failed.to_string(), "a.nc: temp");
    }
}
