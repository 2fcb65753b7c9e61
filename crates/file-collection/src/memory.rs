//! In-memory files.
//!
//! [`MemoryStore`] maps paths to [`MemoryFile`]s and hands out
//! [`MemoryReader`]s, so collections can be built and tested without any
//! file format library.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ReaderError;
use crate::handles::HandlePool;
use crate::reader::{
    Attribute, AttributeValue, Dimension, ElementType, ReaderFactory, ReaderHandle, SimpleReader,
    VariableInfo,
};

/// Dimensions, variables, attributes and row-major data of one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFile {
    dimensions: Vec<Dimension>,
    variables: Vec<VariableInfo>,
    data: BTreeMap<String, Vec<f64>>,
    attributes: Vec<Attribute>,
}

impl MemoryFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension, replacing the length of an existing one.
    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        match self.dimensions.iter_mut().find(|d| d.name == name) {
            Some(dim) => dim.len = len,
            None => self.dimensions.push(Dimension::new(name, len)),
        }
        self
    }

    /// Add a variable with its values in row-major order (last dimension
    /// fastest).
    pub fn with_variable(mut self, name: &str, dim_names: &[&str], xtype: ElementType, data: Vec<f64>) -> Self {
        self.variables.retain(|v| v.name != name);
        self.variables.push(VariableInfo::new(name, dim_names, xtype));
        self.data.insert(name.to_string(), data);
        self
    }

    /// Attach an attribute to an already added variable. Unknown variables
    /// are ignored.
    pub fn with_attribute(mut self, variable: &str, name: &str, value: AttributeValue) -> Self {
        if let Some(info) = self.variables.iter_mut().find(|v| v.name == variable) {
            info.attributes.retain(|a| a.name != name);
            info.attributes.push(Attribute::new(name, value));
        }
        self
    }

    pub fn with_global_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.retain(|a| a.name != name);
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    fn shape_of(&self, variable: &VariableInfo) -> Result<Vec<usize>, ReaderError> {
        variable
            .dim_names
            .iter()
            .map(|name| {
                self.dimensions
                    .iter()
                    .find(|d| &d.name == name)
                    .map(|d| d.len)
                    .ok_or_else(|| ReaderError::shape(format!("{}: undefined dimension {}", variable.name, name)))
            })
            .collect()
    }
}

/// Path to file registry, usable as a [`ReaderFactory`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Arc<MemoryFile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, file: MemoryFile) {
        self.files.insert(path.into(), Arc::new(file));
    }

    pub fn with_file(mut self, path: impl Into<String>, file: MemoryFile) -> Self {
        self.insert(path, file);
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ReaderFactory for MemoryStore {
    fn open(&self, path: &str) -> Result<Box<dyn SimpleReader>, ReaderError> {
        let file = self
            .files
            .get(path)
            .ok_or_else(|| ReaderError::open(path))?;
        Ok(Box::new(MemoryReader::new(path, Arc::clone(file))))
    }
}

/// Reader over a shared [`MemoryFile`].
#[derive(Debug)]
pub struct MemoryReader {
    path: String,
    file: Arc<MemoryFile>,
    open: HandlePool<String>,
}

impl MemoryReader {
    pub fn new(path: impl Into<String>, file: Arc<MemoryFile>) -> Self {
        Self {
            path: path.into(),
            file,
            open: HandlePool::new(),
        }
    }

    /// Number of variables currently open.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl SimpleReader for MemoryReader {
    fn path(&self) -> &str {
        &self.path
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.file.dimensions
    }

    fn variables(&self) -> &[VariableInfo] {
        &self.file.variables
    }

    fn global_attributes(&self) -> &[Attribute] {
        &self.file.attributes
    }

    fn open_read(&mut self, variable: &VariableInfo) -> Result<ReaderHandle, ReaderError> {
        if self.file.variable_info(&variable.name).is_none() {
            return Err(ReaderError::MissingVariable(variable.name.clone()));
        }
        Ok(ReaderHandle(self.open.acquire(variable.name.clone())))
    }

    fn read(
        &mut self,
        handle: ReaderHandle,
        start: &[usize],
        count: &[usize],
        buf: &mut [f64],
    ) -> Result<(), ReaderError> {
        let name = self
            .open
            .get(handle.0)
            .ok_or(ReaderError::InvalidHandle(handle.0))?;
        let info = self
            .file
            .variable_info(name)
            .ok_or_else(|| ReaderError::MissingVariable(name.clone()))?;
        let data = self
            .file
            .data
            .get(name)
            .ok_or_else(|| ReaderError::MissingVariable(name.clone()))?;
        let shape = self.file.shape_of(info)?;

        if start.len() != shape.len() || count.len() != shape.len() {
            return Err(ReaderError::shape(format!(
                "{}: rank {} but start/count have {}/{} entries",
                name,
                shape.len(),
                start.len(),
                count.len()
            )));
        }
        for (axis, &len) in shape.iter().enumerate() {
            if start[axis] + count[axis] > len {
                return Err(ReaderError::shape(format!(
                    "{}: axis {} range {}..{} exceeds length {}",
                    name,
                    axis,
                    start[axis],
                    start[axis] + count[axis],
                    len
                )));
            }
        }
        if data.len() != shape.iter().product::<usize>() {
            return Err(ReaderError::read(format!(
                "{}: {} values stored for shape {:?}",
                name,
                data.len(),
                shape
            )));
        }

        let n: usize = count.iter().product();
        if buf.len() < n {
            return Err(ReaderError::shape(format!(
                "{}: buffer holds {} values, {} requested",
                name,
                buf.len(),
                n
            )));
        }

        let rank = shape.len();
        let mut pos = vec![0usize; rank];
        for out in buf[..n].iter_mut() {
            let linear = (0..rank).fold(0, |acc, d| acc * shape[d] + start[d] + pos[d]);
            *out = data[linear];

            for d in (0..rank).rev() {
                pos[d] += 1;
                if pos[d] < count[d] {
                    break;
                }
                pos[d] = 0;
            }
        }

        Ok(())
    }

    fn close(&mut self, handle: ReaderHandle) -> Result<(), ReaderError> {
        self.open
            .release(handle.0)
            .map(|_| ())
            .ok_or(ReaderError::InvalidHandle(handle.0))
    }
}

impl MemoryFile {
    fn variable_info(&self, name: &str) -> Option<&VariableInfo> {
        self.variables.iter().find(|v| v.name == name)
    }
}
